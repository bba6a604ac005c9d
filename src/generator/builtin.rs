//! Built-in generator catalogue.

use super::{Generator, GeneratorRegistry};
use crate::literal::SqlValue;
use chrono::{Duration, Utc};
use fake::faker::address::en::{
    BuildingNumber, CityName, CountryName, StateName, StreetName, ZipCode,
};
use fake::faker::company::en::{CatchPhrase, CompanyName};
use fake::faker::currency::en::CurrencyCode;
use fake::faker::internet::en::{IPv4, IPv6, Password, SafeEmail, Username};
use fake::faker::job::en::Title;
use fake::faker::lorem::en::{Paragraph, Sentence, Word, Words};
use fake::faker::name::en::{FirstName, LastName, Name, Suffix};
use fake::faker::phone_number::en::PhoneNumber;
use fake::{Fake, Faker};

const DAY_SECONDS: i64 = 86_400;

pub(super) fn register_all(registry: &mut GeneratorRegistry) {
    let functions: &[(&str, &str, fn() -> SqlValue)] = &[
        ("person", "fullName", || SqlValue::Text(Name().fake())),
        ("person", "firstName", || SqlValue::Text(FirstName().fake())),
        ("person", "lastName", || SqlValue::Text(LastName().fake())),
        ("person", "jobTitle", || SqlValue::Text(Title().fake())),
        ("person", "suffix", || SqlValue::Text(Suffix().fake())),
        ("internet", "email", || SqlValue::Text(SafeEmail().fake())),
        ("internet", "userName", || SqlValue::Text(Username().fake())),
        ("internet", "password", || SqlValue::Text(Password(8..16).fake())),
        ("internet", "url", internet_url),
        ("internet", "ipv4", || SqlValue::Text(IPv4().fake())),
        ("internet", "ipv6", || SqlValue::Text(IPv6().fake())),
        ("number", "int", || SqlValue::Int((0..100_000i64).fake())),
        ("number", "float", number_float),
        ("datatype", "boolean", || SqlValue::Bool(Faker.fake())),
        ("date", "past", date_past),
        ("date", "future", date_future),
        ("date", "recent", date_recent),
        ("date", "birthdate", date_birthdate),
        ("string", "uuid", string_uuid),
        ("lorem", "word", || SqlValue::Text(Word().fake())),
        ("lorem", "words", lorem_words),
        ("lorem", "sentence", || SqlValue::Text(Sentence(5..10).fake())),
        ("lorem", "paragraph", || SqlValue::Text(Paragraph(3..5).fake())),
        ("location", "city", || SqlValue::Text(CityName().fake())),
        ("location", "state", || SqlValue::Text(StateName().fake())),
        ("location", "zipCode", || SqlValue::Text(ZipCode().fake())),
        ("location", "streetAddress", street_address),
        ("location", "country", || SqlValue::Text(CountryName().fake())),
        ("phone", "number", || SqlValue::Text(PhoneNumber().fake())),
        ("company", "name", || SqlValue::Text(CompanyName().fake())),
        ("company", "catchPhrase", || SqlValue::Text(CatchPhrase().fake())),
        ("finance", "amount", finance_amount),
        ("finance", "currencyCode", || SqlValue::Text(CurrencyCode().fake())),
    ];
    for (category, name, f) in functions {
        registry.register(category, name, Generator::Func(*f));
    }

    registry.register("literal", "null", Generator::Constant(SqlValue::Null));
    registry.register("literal", "true", Generator::Constant(SqlValue::Bool(true)));
    registry.register("literal", "false", Generator::Constant(SqlValue::Bool(false)));
    registry.register("literal", "empty", Generator::Constant(SqlValue::Text(String::new())));
}

fn internet_url() -> SqlValue {
    format!(
        "https://example{}.com/{}",
        (1..1000u32).fake::<u32>(),
        Word().fake::<String>()
    )
    .into()
}

fn number_float() -> SqlValue {
    let f: f64 = (0.0..1000.0).fake();
    SqlValue::Float((f * 100.0).round() / 100.0)
}

fn date_past() -> SqlValue {
    let back: i64 = (1..365 * DAY_SECONDS).fake();
    SqlValue::Timestamp(Utc::now() - Duration::seconds(back))
}

fn date_future() -> SqlValue {
    let ahead: i64 = (1..365 * DAY_SECONDS).fake();
    SqlValue::Timestamp(Utc::now() + Duration::seconds(ahead))
}

fn date_recent() -> SqlValue {
    let back: i64 = (1..DAY_SECONDS).fake();
    SqlValue::Timestamp(Utc::now() - Duration::seconds(back))
}

fn date_birthdate() -> SqlValue {
    let days: i64 = (18 * 365..80 * 365).fake();
    SqlValue::Date((Utc::now() - Duration::days(days)).date_naive())
}

fn string_uuid() -> SqlValue {
    format!(
        "{:08x}-{:04x}-{:04x}-{:04x}-{:012x}",
        Faker.fake::<u32>(),
        Faker.fake::<u16>(),
        (Faker.fake::<u16>() & 0x0FFF) | 0x4000, // Version 4
        (Faker.fake::<u16>() & 0x3FFF) | 0x8000, // Variant
        Faker.fake::<u64>() & 0xFFFF_FFFF_FFFF_u64
    )
    .into()
}

fn lorem_words() -> SqlValue {
    Words(3..6).fake::<Vec<String>>().join(" ").into()
}

fn street_address() -> SqlValue {
    format!(
        "{} {}",
        BuildingNumber().fake::<String>(),
        StreetName().fake::<String>()
    )
    .into()
}

fn finance_amount() -> SqlValue {
    let cents: i64 = (100..1_000_000i64).fake();
    SqlValue::Float(cents as f64 / 100.0)
}
