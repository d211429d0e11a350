//! Hello negotiation shared by the client and service roles.

use monto_core::{ExtensionSet, ProtocolVersion, SoftwareVersion};
use tracing::debug;

use crate::connection::Connection;
use crate::error::{HandshakeError, ProtocolError};
use crate::hello::{BrokerHello, Hello, NegotiatedSession, Role};

/// Negotiates protocol version and extensions with the broker on a freshly
/// opened connection.
///
/// The local side sends its hello first, then reads the broker's. Negotiation
/// succeeds only if the broker's protocol version is acceptable (same major,
/// equal or higher minor) and every *required* declared extension appears in
/// the broker's supported set. The negotiated extension set is the
/// intersection of the declared and supported sets.
///
/// On any error the connection must be discarded; retrying means opening a
/// new one.
pub async fn handshake(
    conn: &mut Connection,
    version: &SoftwareVersion,
    role: Role,
    extensions: &ExtensionSet,
) -> Result<NegotiatedSession, HandshakeError> {
    let local = ProtocolVersion::CURRENT;
    let hello = Hello {
        monto: local,
        version: version.clone(),
        role,
        extensions: extensions.declared(),
    };
    conn.send(&hello).await.map_err(negotiation_error)?;

    let broker: BrokerHello = match conn.receive().await.map_err(negotiation_error)? {
        Some(hello) => hello,
        None => {
            return Err(HandshakeError::Io(std::io::Error::from(
                std::io::ErrorKind::UnexpectedEof,
            )));
        }
    };
    debug!(broker = %broker.broker, version = %broker.monto, "received broker hello");

    if !local.accepts_broker(&broker.monto) {
        return Err(HandshakeError::VersionMismatch {
            local,
            broker: broker.monto,
        });
    }

    if let Some(missing) = extensions
        .required
        .iter()
        .find(|e| !broker.extensions.contains(*e))
    {
        return Err(HandshakeError::MissingRequiredExtension(missing.clone()));
    }

    let declared = extensions.declared();
    let negotiated = declared
        .intersection(&broker.extensions)
        .cloned()
        .collect();

    Ok(NegotiatedSession {
        // The lower of the two versions is the one in effect.
        protocol: local.min(broker.monto),
        broker: broker.broker,
        extensions: negotiated,
    })
}

/// Maps transport faults during negotiation onto the handshake taxonomy.
fn negotiation_error(err: ProtocolError) -> HandshakeError {
    match err {
        ProtocolError::Serialization(e) => HandshakeError::MalformedHello(e.to_string()),
        ProtocolError::Io(e) => HandshakeError::Io(e),
        other => HandshakeError::MalformedHello(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framing::{decode_message, encode_message};
    use monto_core::Identifier;
    use serde::Serialize;
    use serde_json::json;
    use std::collections::BTreeSet;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    fn id(s: &str) -> Identifier {
        s.parse().unwrap()
    }

    fn local_version() -> SoftwareVersion {
        SoftwareVersion::new(id("com.example.tool")).with_version(1, 0, 0)
    }

    fn broker_hello(monto: ProtocolVersion, extensions: &[&str]) -> BrokerHello {
        BrokerHello {
            monto,
            broker: SoftwareVersion::new(id("org.example.broker")),
            extensions: extensions.iter().map(|e| id(e)).collect(),
        }
    }

    async fn read_frame(stream: &mut TcpStream) -> Hello {
        let mut len_buf = [0u8; 4];
        stream.read_exact(&mut len_buf).await.unwrap();
        let len = u32::from_be_bytes(len_buf) as usize;
        let mut payload = vec![0u8; len];
        stream.read_exact(&mut payload).await.unwrap();

        let mut frame = len_buf.to_vec();
        frame.extend_from_slice(&payload);
        decode_message(&frame).unwrap()
    }

    async fn write_frame<T: Serialize>(stream: &mut TcpStream, msg: &T) {
        let frame = encode_message(msg).unwrap();
        stream.write_all(&frame).await.unwrap();
    }

    /// Spawns a scripted broker that reads the peer hello and answers with
    /// `reply`. Returns the connection and a handle resolving to the hello
    /// the broker saw.
    async fn scripted_broker(reply: BrokerHello) -> (Connection, JoinHandle<Hello>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let broker = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let hello = read_frame(&mut stream).await;
            write_frame(&mut stream, &reply).await;
            hello
        });
        let conn = Connection::open("127.0.0.1", addr.port()).await.unwrap();
        (conn, broker)
    }

    #[tokio::test]
    async fn negotiation_succeeds_with_matching_versions() {
        let reply = broker_hello(ProtocolVersion::CURRENT, &["com.example.alpha"]);
        let (mut conn, broker) = scripted_broker(reply).await;

        let extensions = ExtensionSet::new()
            .require(id("com.example.alpha"))
            .prefer(id("com.example.beta"));
        let session = handshake(&mut conn, &local_version(), Role::Service, &extensions)
            .await
            .unwrap();

        assert_eq!(session.protocol, ProtocolVersion::CURRENT);
        assert_eq!(session.broker.id, id("org.example.broker"));
        // beta is declared but unsupported, so it drops out.
        assert_eq!(
            session.extensions,
            [id("com.example.alpha")].into_iter().collect()
        );

        let sent = broker.await.unwrap();
        assert_eq!(sent.role, Role::Service);
        assert_eq!(sent.version, local_version());
        assert_eq!(sent.extensions.len(), 2);
    }

    #[tokio::test]
    async fn higher_broker_minor_is_accepted() {
        let mut higher = ProtocolVersion::CURRENT;
        higher.minor += 2;
        let (mut conn, _broker) = scripted_broker(broker_hello(higher, &[])).await;

        let session = handshake(
            &mut conn,
            &local_version(),
            Role::Client,
            &ExtensionSet::default(),
        )
        .await
        .unwrap();

        // The lower version stays in effect.
        assert_eq!(session.protocol, ProtocolVersion::CURRENT);
    }

    #[tokio::test]
    async fn different_major_is_a_version_mismatch() {
        let other = ProtocolVersion::new(ProtocolVersion::CURRENT.major + 1, 0, 0);
        let (mut conn, _broker) = scripted_broker(broker_hello(other, &[])).await;

        let result = handshake(
            &mut conn,
            &local_version(),
            Role::Client,
            &ExtensionSet::default(),
        )
        .await;
        assert!(matches!(
            result,
            Err(HandshakeError::VersionMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn missing_required_extension_fails() {
        let reply = broker_hello(ProtocolVersion::CURRENT, &["com.example.other"]);
        let (mut conn, _broker) = scripted_broker(reply).await;

        let extensions = ExtensionSet::new().require(id("com.example.alpha"));
        let result = handshake(&mut conn, &local_version(), Role::Service, &extensions).await;
        match result {
            Err(HandshakeError::MissingRequiredExtension(ext)) => {
                assert_eq!(ext, id("com.example.alpha"));
            }
            other => panic!("expected MissingRequiredExtension, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_optional_extension_is_fine() {
        let reply = broker_hello(ProtocolVersion::CURRENT, &[]);
        let (mut conn, _broker) = scripted_broker(reply).await;

        let extensions = ExtensionSet::new().prefer(id("com.example.alpha"));
        let session = handshake(&mut conn, &local_version(), Role::Service, &extensions)
            .await
            .unwrap();
        assert!(session.extensions.is_empty());
    }

    #[tokio::test]
    async fn extension_declaration_order_is_irrelevant() {
        let supported = ["com.example.x", "com.example.y"];
        let forward = ExtensionSet::new()
            .prefer(id("com.example.x"))
            .prefer(id("com.example.y"));
        let backward = ExtensionSet::new()
            .prefer(id("com.example.y"))
            .prefer(id("com.example.x"));

        let mut sessions = Vec::new();
        for extensions in [forward, backward] {
            let reply = broker_hello(ProtocolVersion::CURRENT, &supported);
            let (mut conn, _broker) = scripted_broker(reply).await;
            sessions.push(
                handshake(&mut conn, &local_version(), Role::Client, &extensions)
                    .await
                    .unwrap(),
            );
        }
        assert_eq!(sessions[0], sessions[1]);
    }

    #[tokio::test]
    async fn malformed_broker_hello_is_rejected() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let _hello = read_frame(&mut stream).await;
            // A well-framed reply of the wrong shape.
            write_frame(&mut stream, &json!({"surprise": true})).await;
        });

        let mut conn = Connection::open("127.0.0.1", addr.port()).await.unwrap();
        let result = handshake(
            &mut conn,
            &local_version(),
            Role::Client,
            &ExtensionSet::default(),
        )
        .await;
        assert!(matches!(result, Err(HandshakeError::MalformedHello(_))));
    }

    #[tokio::test]
    async fn broker_closing_mid_handshake_is_io() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let _hello = read_frame(&mut stream).await;
            // Close without answering.
            stream.shutdown().await.unwrap();
        });

        let mut conn = Connection::open("127.0.0.1", addr.port()).await.unwrap();
        let result = handshake(
            &mut conn,
            &local_version(),
            Role::Client,
            &ExtensionSet::default(),
        )
        .await;
        assert!(matches!(result, Err(HandshakeError::Io(_))));
    }
}
