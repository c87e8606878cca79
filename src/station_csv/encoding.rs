use encoding_rs::Encoding;

/// Decodes `bytes` with the first candidate that accepts them without malformed sequences.
///
/// Returns the decoded text together with the encoding that produced it, or `None`
/// when every candidate rejects the input. A byte order mark is not interpreted.
///
/// # Examples
///
/// ```
/// use encoding_rs::{ISO_8859_2, UTF_8};
/// use weather_etl::decode_with_fallback;
///
/// // 0xB1 is not valid UTF-8 on its own, but is "ą" in ISO-8859-2.
/// let (text, encoding) = decode_with_fallback(&[0x57, 0xB1], &[UTF_8, ISO_8859_2]).unwrap();
/// assert_eq!(text, "Wą");
/// assert_eq!(encoding, ISO_8859_2);
/// ```
pub fn decode_with_fallback(
    bytes: &[u8],
    candidates: &[&'static Encoding],
) -> Option<(String, &'static Encoding)> {
    candidates.iter().find_map(|encoding| {
        encoding
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(|text| (text.into_owned(), *encoding))
    })
}

pub(crate) fn encoding_names(candidates: &[&'static Encoding]) -> String {
    candidates
        .iter()
        .map(|encoding| encoding.name())
        .collect::<Vec<_>>()
        .join(", ")
}
