#![allow(missing_docs)]

pub mod access;
pub mod codec;
pub mod draft;
pub mod field;
pub mod ident;
pub mod settings;
pub mod tag;
pub mod v1;

pub use access::{AccessList, partition_access};
pub use codec::{
    CodecError, DecodedForm, FormInitData, decode_form_spec, encode_form_spec, resolve_settings,
};
pub use draft::{Draft, remove_draft, upsert_draft};
pub use field::{DEFAULT_ANSWER_TYPE, DEFAULT_QUESTION_LABEL, Field, generate_question};
pub use ident::make_tag;
pub use settings::{
    BackgroundType, FormSettings, SettingsPatch, is_truthy, normalize_legacy_settings,
};
pub use tag::{Tag, kind};
pub use v1::{
    AnswerSettings, FieldSpec, FormSpec, V1Field, V1FormSpec, convert_from_spec_to_template,
};
