//! The per-connection dispatch loop.

use monto_protocol::{Connection, Message, ProductResponse, ResponseBody, ServiceErrors};
use tracing::{debug, info, warn};

use crate::error::ServeResult;
use crate::registry::ProviderRegistry;

/// Reads broker requests and invokes providers until the connection ends.
///
/// Frames are processed strictly in arrival order by the single calling
/// task. Provider failures and unknown capabilities are answered with error
/// replies and never end the loop; notifications and stray response frames
/// are logged and ignored. Returns `Ok(())` when the broker closes the
/// connection cleanly; a transport fault or malformed frame is fatal and
/// surfaces as `Err`.
pub async fn run(conn: &mut Connection, registry: &mut ProviderRegistry) -> ServeResult<()> {
    loop {
        match conn.receive::<Message>().await {
            Ok(Some(Message::Request(request))) => {
                let descriptor = request.descriptor();
                debug!(id = %request.id, product = %descriptor, "dispatching request");

                let body = match registry.lookup(&descriptor) {
                    Some(provider) => match provider(&request) {
                        Ok(product) => ResponseBody::Product(product),
                        Err(errors) => {
                            warn!(id = %request.id, count = errors.errors.len(),
                                "provider reported errors");
                            ResponseBody::Errors(errors)
                        }
                    },
                    None => {
                        warn!(product = %descriptor, "no provider registered");
                        ResponseBody::Errors(ServiceErrors::unsupported(descriptor))
                    }
                };

                let response = ProductResponse {
                    id: request.id,
                    body,
                };
                conn.send(&Message::Response(response)).await?;
            }
            Ok(Some(Message::Notification(_))) => {
                debug!("ignoring broker notification");
            }
            Ok(Some(Message::Response(response))) => {
                warn!(id = %response.id, "ignoring unexpected response frame from broker");
            }
            Ok(None) => {
                info!("broker closed the connection");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }
    }
}
