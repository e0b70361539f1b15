use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use url::Url;

use super::xml::{TransportError, endpoint_url, find_element};
use crate::domain::{
    AccountReference, MessageId, MessageText, Recipient, Retries, SendMessage, SenderNumber,
};

/// Language tag sent with every message; drives the text-to-speech voice.
pub const MESSAGE_LANGUAGE: &str = "fr-FR";

const HEADER_ELEMENT: &str = "messageheader";

/// Account-level values embedded in every dispatch request.
#[derive(Debug, Clone, Copy)]
pub struct DispatchContext<'a> {
    pub account: &'a AccountReference,
    pub sender: &'a SenderNumber,
    pub retries: Retries,
}

pub fn dispatch_url(host: &Url) -> Result<Url, TransportError> {
    endpoint_url(host, &["messagedispatcher"])
}

pub fn encode_dispatch_xml(
    context: DispatchContext<'_>,
    request: &SendMessage,
) -> Result<String, TransportError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    writer.write_event(Event::Start(BytesStart::new("messages")))?;
    write_text_element(
        &mut writer,
        AccountReference::FIELD,
        context.account.as_str(),
    )?;
    write_text_element(&mut writer, SenderNumber::FIELD, context.sender.as_str())?;

    writer.write_event(Event::Start(BytesStart::new("message")))?;
    write_text_element(&mut writer, Recipient::FIELD, request.recipient().as_str())?;
    write_text_element(&mut writer, "type", request.kind().wire_name())?;
    write_text_element(&mut writer, MessageText::FIELD, request.text().as_str())?;
    write_text_element(&mut writer, "lang", MESSAGE_LANGUAGE)?;
    write_text_element(
        &mut writer,
        Retries::FIELD,
        &context.retries.get().to_string(),
    )?;
    writer.write_event(Event::End(BytesEnd::new("message")))?;

    writer.write_event(Event::End(BytesEnd::new("messages")))?;

    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), TransportError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

pub fn decode_dispatch_xml_response(xml: &str) -> Result<MessageId, TransportError> {
    let doc = roxmltree::Document::parse(xml)?;
    let header = find_element(&doc, HEADER_ELEMENT).ok_or(TransportError::MissingElement {
        name: HEADER_ELEMENT,
    })?;

    header
        .attribute(MessageId::FIELD)
        .and_then(|id| MessageId::new(id).ok())
        .ok_or(TransportError::MissingAttribute {
            element: HEADER_ELEMENT,
            attribute: MessageId::FIELD,
        })
}
