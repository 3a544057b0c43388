use crate::{Error, Result};
use anyhow::{Context, bail};
use proc_macro2::TokenStream;
use quote::{ToTokens, TokenStreamExt, quote};

/// Text encoding of character data carried by large objects.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    #[default]
    Utf8,
    Utf16Le,
    Utf16Be,
    Latin1,
}

impl Encoding {
    /// Accepts the usual labels, case insensitive (`utf-8`, `UTF16LE`, `iso-8859-1`).
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        Some(match label.as_str() {
            "utf8" => Encoding::Utf8,
            "utf16le" | "utf16" => Encoding::Utf16Le,
            "utf16be" => Encoding::Utf16Be,
            "latin1" | "iso88591" => Encoding::Latin1,
            _ => return None,
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Encoding::Utf8 => "UTF-8",
            Encoding::Utf16Le => "UTF-16LE",
            Encoding::Utf16Be => "UTF-16BE",
            Encoding::Latin1 => "ISO-8859-1",
        }
    }

    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        Ok(match self {
            Encoding::Utf8 => text.as_bytes().to_vec(),
            Encoding::Utf16Le => text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
            Encoding::Utf16Be => text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
            Encoding::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)))
                .collect::<std::result::Result<_, _>>()
                .map_err(|_| Error::conversion_to(&text, self.label()))?,
        })
    }

    pub fn decode(&self, bytes: &[u8]) -> anyhow::Result<String> {
        match self {
            Encoding::Utf8 => String::from_utf8(bytes.to_vec()).context("Invalid UTF-8 text"),
            Encoding::Utf16Le | Encoding::Utf16Be => {
                if bytes.len() % 2 != 0 {
                    bail!(
                        "{} text has an odd number of bytes ({})",
                        self.label(),
                        bytes.len()
                    );
                }
                let units = bytes.chunks_exact(2).map(|v| {
                    let pair = [v[0], v[1]];
                    if *self == Encoding::Utf16Le {
                        u16::from_le_bytes(pair)
                    } else {
                        u16::from_be_bytes(pair)
                    }
                });
                char::decode_utf16(units)
                    .collect::<std::result::Result<String, _>>()
                    .with_context(|| format!("Invalid {} text", self.label()))
            }
            Encoding::Latin1 => Ok(bytes.iter().map(|b| char::from(*b)).collect()),
        }
    }
}

impl ToTokens for Encoding {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        use Encoding::*;
        tokens.append_all(match self {
            Utf8 => quote!(::tabula::Encoding::Utf8),
            Utf16Le => quote!(::tabula::Encoding::Utf16Le),
            Utf16Be => quote!(::tabula::Encoding::Utf16Be),
            Latin1 => quote!(::tabula::Encoding::Latin1),
        });
    }
}
