//! Transport layer: HTTP and wire-format details (XML rendering and parsing).

mod dispatch;
mod message_header;
mod xml;

pub use dispatch::{
    DispatchContext, decode_dispatch_xml_response, dispatch_url, encode_dispatch_xml,
};
pub use message_header::{decode_message_header_xml_response, message_header_url};
pub use xml::{NAMESPACE, TransportError};
