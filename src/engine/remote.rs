//! Bridge client: the production [`Connector`] implementation.
//!
//! The engine runs as a separate process with a bridge listener on a TCP
//! port (conventionally 2002). The bridge speaks newline-delimited JSON:
//! one request line `{"id":n,"method":"…","params":{…}}`, one reply line
//! `{"id":n,"result":{…}}` or `{"id":n,"error":{"code":c,"message":"…"}}`.
//!
//! The client is synchronous and blocking: one request in flight, replies
//! matched by id, socket timeouts from [`Endpoint`] as the only deadline
//! mechanism. One connection is owned by exactly one session; there is no
//! pooling and no sharing.
//!
//! Three failure surfaces, three error kinds:
//! * cannot reach or handshake the engine → [`ConvertError::Connection`]
//! * the engine replies with an error object → [`ConvertError::Engine`]
//!   carrying the engine's code
//! * the transport dies mid-session or the reply is unreadable →
//!   [`ConvertError::Protocol`]

use crate::config::Endpoint;
use crate::engine::{Connector, Document, LoadOptions, PropList, PropValue, Session};
use crate::error::ConvertError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::{Arc, Mutex};
use tracing::{debug, trace};

/// Error code the bridge reports for an operation the document's type
/// does not implement (e.g. refresh on a drawing).
const UNSUPPORTED_OPERATION: i64 = 501;

#[derive(Serialize)]
struct Request<'a> {
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct Response {
    id: u64,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<WireError>,
}

#[derive(Deserialize)]
struct WireError {
    code: i64,
    message: String,
}

/// One bridge connection: socket, buffered read half, request counter.
#[derive(Debug)]
struct Wire {
    stream: TcpStream,
    reader: BufReader<TcpStream>,
    next_id: u64,
}

impl Wire {
    fn call(&mut self, method: &str, params: Value) -> Result<Value, ConvertError> {
        self.next_id += 1;
        let request = Request {
            id: self.next_id,
            method,
            params,
        };
        let mut line = serde_json::to_string(&request).map_err(|e| ConvertError::Protocol {
            detail: format!("failed to encode '{method}' request: {e}"),
        })?;
        line.push('\n');
        trace!(method, id = request.id, "bridge request");
        self.stream
            .write_all(line.as_bytes())
            .map_err(|e| ConvertError::Protocol {
                detail: format!("send failed during '{method}': {e}"),
            })?;

        let mut reply = String::new();
        let read = self
            .reader
            .read_line(&mut reply)
            .map_err(|e| ConvertError::Protocol {
                detail: format!("receive failed during '{method}': {e}"),
            })?;
        if read == 0 {
            return Err(ConvertError::Protocol {
                detail: format!("engine closed the connection during '{method}'"),
            });
        }

        let response: Response =
            serde_json::from_str(reply.trim_end()).map_err(|e| ConvertError::Protocol {
                detail: format!("malformed reply to '{method}': {e}"),
            })?;
        if response.id != request.id {
            return Err(ConvertError::Protocol {
                detail: format!(
                    "reply id {} does not match request id {} for '{method}'",
                    response.id, request.id
                ),
            });
        }
        if let Some(error) = response.error {
            return Err(ConvertError::Engine {
                code: error.code,
                detail: error.message,
            });
        }
        Ok(response.result.unwrap_or(Value::Null))
    }
}

/// Connects to an engine's bridge listener.
pub struct RemoteConnector {
    endpoint: Endpoint,
}

impl RemoteConnector {
    pub fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }
}

impl Connector for RemoteConnector {
    type Session = RemoteSession;

    fn connect(&self) -> Result<RemoteSession, ConvertError> {
        let ep = &self.endpoint;
        let connection_error = |detail: String| ConvertError::Connection {
            host: ep.host.clone(),
            port: ep.port,
            detail,
        };

        let addr = (ep.host.as_str(), ep.port)
            .to_socket_addrs()
            .map_err(|e| connection_error(e.to_string()))?
            .next()
            .ok_or_else(|| connection_error("host resolved to no address".to_string()))?;

        let stream = TcpStream::connect_timeout(&addr, ep.connect_timeout)
            .map_err(|e| connection_error(e.to_string()))?;
        stream
            .set_read_timeout(Some(ep.io_timeout))
            .and_then(|()| stream.set_write_timeout(Some(ep.io_timeout)))
            .and_then(|()| stream.set_nodelay(true))
            .map_err(|e| connection_error(e.to_string()))?;
        let reader = BufReader::new(
            stream
                .try_clone()
                .map_err(|e| connection_error(e.to_string()))?,
        );

        let mut wire = Wire {
            stream,
            reader,
            next_id: 0,
        };

        // Handshake probe: any failure here, including an error reply,
        // means there is no usable engine at this endpoint.
        wire.call("ping", json!({}))
            .map_err(|e| connection_error(e.to_string()))?;
        debug!(host = %ep.host, port = ep.port, "connected to engine bridge");

        Ok(RemoteSession {
            wire: Arc::new(Mutex::new(wire)),
        })
    }
}

/// An established bridge session.
#[derive(Debug)]
pub struct RemoteSession {
    wire: Arc<Mutex<Wire>>,
}

impl RemoteSession {
    fn call(&self, method: &str, params: Value) -> Result<Value, ConvertError> {
        self.wire
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .call(method, params)
    }
}

impl Session for RemoteSession {
    type Document = RemoteDocument;

    fn load(
        &mut self,
        url: &str,
        options: &LoadOptions,
    ) -> Result<RemoteDocument, ConvertError> {
        let mut params = serde_json::Map::new();
        params.insert("url".to_string(), json!(url));
        params.insert("hidden".to_string(), json!(options.hidden));
        if let Some(ref name) = options.filter_name {
            params.insert("filter_name".to_string(), json!(name));
        }
        if let Some(ref opts) = options.filter_options {
            params.insert("filter_options".to_string(), json!(opts));
        }

        let result = self.call("load", Value::Object(params))?;
        let handle = result
            .get("document")
            .and_then(Value::as_str)
            .ok_or_else(|| ConvertError::Protocol {
                detail: "load reply carried no document handle".to_string(),
            })?
            .to_string();
        debug!(%handle, "document loaded");

        Ok(RemoteDocument {
            wire: Arc::clone(&self.wire),
            handle,
        })
    }
}

/// A document loaded through the bridge, addressed by its engine handle.
#[derive(Debug)]
pub struct RemoteDocument {
    wire: Arc<Mutex<Wire>>,
    handle: String,
}

impl RemoteDocument {
    fn call(&self, method: &str, mut params: serde_json::Map<String, Value>) -> Result<Value, ConvertError> {
        params.insert("document".to_string(), json!(self.handle));
        self.wire
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .call(method, Value::Object(params))
    }
}

fn props_object(properties: &PropList) -> Result<Value, ConvertError> {
    let mut map = serde_json::Map::new();
    for (name, value) in properties {
        let value = serde_json::to_value(value).map_err(|e| ConvertError::Protocol {
            detail: format!("failed to encode property '{name}': {e}"),
        })?;
        map.insert(name.clone(), value);
    }
    Ok(Value::Object(map))
}

impl Document for RemoteDocument {
    fn refresh(&mut self) -> Result<bool, ConvertError> {
        match self.call("refresh", serde_json::Map::new()) {
            Ok(_) => Ok(true),
            Err(ConvertError::Engine {
                code: UNSUPPORTED_OPERATION,
                ..
            }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn supports_service(&self, service: &str) -> Result<bool, ConvertError> {
        let mut params = serde_json::Map::new();
        params.insert("service".to_string(), json!(service));
        let result = self.call("supports_service", params)?;
        result
            .get("supported")
            .and_then(Value::as_bool)
            .ok_or_else(|| ConvertError::Protocol {
                detail: "supports_service reply carried no verdict".to_string(),
            })
    }

    fn page_style_names(&self) -> Result<Vec<String>, ConvertError> {
        let result = self.call("page_style_names", serde_json::Map::new())?;
        let styles = result
            .get("styles")
            .and_then(Value::as_array)
            .ok_or_else(|| ConvertError::Protocol {
                detail: "page_style_names reply carried no style list".to_string(),
            })?;
        Ok(styles
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect())
    }

    fn set_page_style_property(
        &mut self,
        style: &str,
        property: &str,
        value: PropValue,
    ) -> Result<(), ConvertError> {
        let mut params = serde_json::Map::new();
        params.insert("style".to_string(), json!(style));
        params.insert("property".to_string(), json!(property));
        params.insert(
            "value".to_string(),
            serde_json::to_value(&value).map_err(|e| ConvertError::Protocol {
                detail: format!("failed to encode style property '{property}': {e}"),
            })?,
        );
        self.call("set_page_style_property", params)?;
        Ok(())
    }

    fn set_printer(&mut self, properties: &PropList) -> Result<(), ConvertError> {
        let mut params = serde_json::Map::new();
        params.insert("properties".to_string(), props_object(properties)?);
        self.call("set_printer", params)?;
        Ok(())
    }

    fn store_to_url(&mut self, url: &str, properties: &PropList) -> Result<(), ConvertError> {
        let mut params = serde_json::Map::new();
        params.insert("url".to_string(), json!(url));
        params.insert("properties".to_string(), props_object(properties)?);
        self.call("store", params)?;
        Ok(())
    }

    fn page_count(&self) -> Result<usize, ConvertError> {
        let result = self.call("page_count", serde_json::Map::new())?;
        result
            .get("pages")
            .and_then(Value::as_u64)
            .map(|n| n as usize)
            .ok_or_else(|| ConvertError::Protocol {
                detail: "page_count reply carried no count".to_string(),
            })
    }

    fn export_page(
        &mut self,
        index: usize,
        media_type: &str,
        url: &str,
    ) -> Result<(), ConvertError> {
        let mut params = serde_json::Map::new();
        params.insert("page".to_string(), json!(index));
        params.insert("media_type".to_string(), json!(media_type));
        params.insert("url".to_string(), json!(url));
        self.call("export_page", params)?;
        Ok(())
    }

    fn close(&mut self, discard: bool) -> Result<(), ConvertError> {
        let mut params = serde_json::Map::new();
        params.insert("discard".to_string(), json!(discard));
        self.call("close", params)?;
        debug!(handle = %self.handle, "document closed");
        Ok(())
    }
}
