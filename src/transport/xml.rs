use url::Url;

/// Namespace of every element in Esendex API responses.
pub const NAMESPACE: &str = "http://api.esendex.com/ns/";

pub const API_VERSION: &str = "v1.0";

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid XML response: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("failed to render XML request: {0}")]
    Write(#[from] quick_xml::Error),

    #[error("rendered XML request is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("response has no <{name}> element")]
    MissingElement { name: &'static str },

    #[error("response <{element}> element has no usable `{attribute}` attribute")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("invalid timestamp in response: {input}")]
    InvalidTimestamp { input: String },

    #[error("host url cannot carry a path: {url}")]
    InvalidBaseUrl { url: String },
}

/// The root element or the first of its direct children named `name` in the Esendex
/// namespace. Deeper elements are never matched.
pub(crate) fn find_element<'a, 'input>(
    doc: &'a roxmltree::Document<'input>,
    name: &str,
) -> Option<roxmltree::Node<'a, 'input>> {
    let root = doc.root_element();
    std::iter::once(root)
        .chain(root.children())
        .find(|node| node.is_element() && node.has_tag_name((NAMESPACE, name)))
}

/// Append `segments` to the path of `host`, keeping any path prefix it already has.
pub(crate) fn endpoint_url(host: &Url, segments: &[&str]) -> Result<Url, TransportError> {
    let mut url = host.clone();
    url.path_segments_mut()
        .map_err(|()| TransportError::InvalidBaseUrl {
            url: host.to_string(),
        })?
        .pop_if_empty()
        .push(API_VERSION)
        .extend(segments);
    Ok(url)
}
