// Shared fixture: the application configuration exercised across module tests

use crate::codec::Pin;
use crate::flags::Flags;
use crate::lens;
use crate::schema::Composite;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfigObj {
    pub ids: Vec<u32>,
}

impl AppConfigObj {
    pub fn schema() -> Composite<AppConfigObj> {
        Composite::builder()
            .value_list(lens!(AppConfigObj, ids), "/ids")
            .build()
            .expect("valid schema")
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    pub num_i8: i8,
    pub num_u8: u8,
    pub num_i16: i16,
    pub num_u16: u16,
    pub num_i32: i32,
    pub num_u32: u32,
    pub num_i64: i64,
    pub num_u64: u64,
    pub num_int: i32,
    pub num_float: f32,
    pub num_double: f64,
    pub boolean: bool,
    pub pin: Pin,
    pub str: String,
    pub num_list: Vec<i32>,
    pub str_list: Vec<String>,
    pub obj_list: Vec<AppConfigObj>,
}

impl AppConfig {
    pub fn schema() -> &'static Composite<AppConfig> {
        static SCHEMA: OnceLock<Composite<AppConfig>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Composite::builder()
                .field(lens!(AppConfig, num_i8), "/numI8")
                .field(lens!(AppConfig, num_u8), "/numU8")
                .field(lens!(AppConfig, num_i16), "/numI16")
                .field(lens!(AppConfig, num_u16), "/numU16")
                .field(lens!(AppConfig, num_i32), "/numI32")
                .field(lens!(AppConfig, num_u32), "/numU32")
                .field(lens!(AppConfig, num_i64), "/numI64")
                .field(lens!(AppConfig, num_u64), "/numU64")
                .field_as(lens!(AppConfig, num_int), "/numInt", Some("/i"), Flags::DISABLE_PERSISTENCE)
                .field(lens!(AppConfig, num_float), "/numFloat")
                .field(lens!(AppConfig, num_double), "/numDouble")
                .field(lens!(AppConfig, boolean), "/boolean")
                .field(lens!(AppConfig, pin), "/pin")
                .field(lens!(AppConfig, str), "/str")
                .value_list(lens!(AppConfig, num_list), "/numList")
                .value_list(lens!(AppConfig, str_list), "/strList")
                .list_as(lens!(AppConfig, obj_list), "/objList", Some("/ol"), AppConfigObj::schema(), Flags::NONE)
                .build()
                .expect("valid schema")
        })
    }
}
