use chrono::{DateTime, FixedOffset, NaiveDateTime};
use url::Url;

use super::xml::{TransportError, endpoint_url, find_element};
use crate::domain::{MessageId, MessageState, MessageStatus};

const STATUS_ELEMENT: &str = "status";
const LAST_STATUS_AT_ELEMENT: &str = "laststatusat";

pub fn message_header_url(host: &Url, message_id: &MessageId) -> Result<Url, TransportError> {
    endpoint_url(host, &["messageheaders", message_id.as_str()])
}

pub fn decode_message_header_xml_response(xml: &str) -> Result<MessageStatus, TransportError> {
    let doc = roxmltree::Document::parse(xml)?;

    let status = find_element(&doc, STATUS_ELEMENT).ok_or(TransportError::MissingElement {
        name: STATUS_ELEMENT,
    })?;
    let state = MessageState::from_gateway(status.text().unwrap_or_default());

    let updated_at = find_element(&doc, LAST_STATUS_AT_ELEMENT)
        .and_then(|node| node.text())
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(parse_timestamp)
        .transpose()?;

    Ok(MessageStatus::new(state, updated_at))
}

/// RFC 3339 first; a timestamp without offset is taken as UTC.
fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, TransportError> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at);
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc().fixed_offset())
        .map_err(|_| TransportError::InvalidTimestamp {
            input: raw.to_owned(),
        })
}
