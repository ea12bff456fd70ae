//! Wordbag core: the pure text-to-token transform.
//!
//! Nothing in this crate performs IO. Markup stripping and fetching live in
//! `wordbag_engine`; this crate starts from extracted text lines.
mod bag;
mod filter;
mod frequency;
mod normalize;
mod stopwords;

pub use bag::TokenBag;
pub use filter::{is_token_char, substitute_disallowed, TokenFilter, RESERVED_SYMBOLS};
pub use frequency::{DocumentFrequency, TokenCount};
pub use normalize::{join_fragments, split_fragments};
pub use stopwords::{StopwordSet, UnknownLanguage};
