use winnow::{
    Bytes, ModalResult, Parser,
    binary::{
        Endianness, be_u8,
        bits::{bits, bool as take_bool, take as take_bits},
    },
    combinator::fail,
    error::{ContextError, ErrMode, StrContext},
    token::{rest, take},
};

use crate::{
    header::NdefHeader,
    payload::{NdefPayload, TextPayload, TextPayloadFormat},
    record::{NdefRecord, TEXT_RECORD_TYPE},
    type_name_format::TypeNameFormat,
};

/// A complete NDEF message, tags hand over the whole message at once
pub type Stream<'i> = &'i Bytes;

pub fn stream(bytes: &[u8]) -> Stream<'_> {
    Bytes::new(bytes)
}

/// Parse records until the one flagged as message end, or until the input runs out
pub fn parse_ndef_records(input: &mut Stream<'_>) -> ModalResult<Vec<NdefRecord>> {
    let mut records = Vec::new();

    loop {
        let record = parse_ndef_record.parse_next(input)?;
        let message_end = record.header.message_end;
        records.push(record);

        if message_end || input.is_empty() {
            break;
        }
    }

    Ok(records)
}

pub fn parse_ndef_record(input: &mut Stream<'_>) -> ModalResult<NdefRecord> {
    let header = parse_header.parse_next(input)?;
    let type_ = parse_type(input, header.type_length)?;
    let id = parse_id(input, header.id_length)?;
    let payload = parse_payload(input, &header, &type_)?;

    Ok(NdefRecord { header, type_, id, payload })
}

// private
fn parse_header_byte(input: &mut Stream<'_>) -> ModalResult<(bool, bool, bool, bool, bool, u8)> {
    bits::<_, _, ErrMode<ContextError>, _, _>((
        take_bool,
        take_bool,
        take_bool,
        take_bool,
        take_bool,
        take_bits(3_u8),
    ))
    .parse_next(input)
}

fn parse_header(input: &mut Stream<'_>) -> ModalResult<NdefHeader> {
    let (message_begin, message_end, chunked, short_record, has_id_length, type_name_format) =
        parse_header_byte.context(StrContext::Label("record header")).parse_next(input)?;

    let type_length = be_u8.context(StrContext::Label("type length")).parse_next(input)?;

    let payload_length = if short_record {
        be_u8.map(u32::from).parse_next(input)?
    } else {
        winnow::binary::u32(Endianness::Big).parse_next(input)?
    };

    let id_length = if has_id_length {
        Some(be_u8.context(StrContext::Label("id length")).parse_next(input)?)
    } else {
        None
    };

    Ok(NdefHeader {
        message_begin,
        message_end,
        chunked,
        short_record,
        has_id_length,
        type_name_format: TypeNameFormat::from_bits(type_name_format),
        type_length,
        payload_length,
        id_length,
    })
}

fn parse_type(input: &mut Stream<'_>, type_length: u8) -> ModalResult<Vec<u8>> {
    take(type_length as usize)
        .map(|s: &[u8]| s.to_vec())
        .context(StrContext::Label("record type"))
        .parse_next(input)
}

fn parse_id(input: &mut Stream<'_>, id_length: Option<u8>) -> ModalResult<Option<Vec<u8>>> {
    let Some(id_length) = id_length else { return Ok(None) };

    take(id_length as usize)
        .map(|s: &[u8]| Some(s.to_vec()))
        .context(StrContext::Label("record id"))
        .parse_next(input)
}

fn parse_payload(
    input: &mut Stream<'_>,
    header: &NdefHeader,
    type_: &[u8],
) -> ModalResult<NdefPayload> {
    let payload = take(header.payload_length as usize)
        .context(StrContext::Label("record payload"))
        .parse_next(input)?;

    if header.type_name_format == TypeNameFormat::WellKnown && type_ == TEXT_RECORD_TYPE {
        let mut payload = stream(payload);
        return parse_text_payload.map(NdefPayload::Text).parse_next(&mut payload);
    }

    Ok(NdefPayload::Data(payload.to_vec()))
}

/// Status byte: bit 7 is the encoding, bit 6 is reserved, bits 5..0 are the language code length
fn parse_text_payload(input: &mut Stream<'_>) -> ModalResult<TextPayload> {
    let (is_utf16, _reserved, language_code_length): (bool, u8, u8) =
        bits::<_, _, ErrMode<ContextError>, _, _>((take_bool, take_bits(1_u8), take_bits(6_u8)))
            .context(StrContext::Label("text status byte"))
            .parse_next(input)?;

    if input.len() < language_code_length as usize {
        return fail.context(StrContext::Label("text language code length")).parse_next(input);
    }

    let language_code = take(language_code_length as usize).parse_next(input)?;

    let format = match is_utf16 {
        true => TextPayloadFormat::Utf16,
        false => TextPayloadFormat::Utf8,
    };

    // the text runs until the end of the payload
    let text = rest.map(|s: &[u8]| format.decode(s)).parse_next(input)?;

    Ok(TextPayload {
        format,
        language: String::from_utf8_lossy(language_code).to_string(),
        text,
    })
}
