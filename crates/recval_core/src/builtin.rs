//! Built-in `User` and `Address` schemas.

use crate::{CrossFieldRule, FieldBuilder, Pattern, Result, SchemaBuilder, SchemaNode};

/// Latin and Cyrillic letters (including Ё/ё), hyphen and space.
pub const NAME_PATTERN: &str = r"[a-zA-ZА-Яа-яЁё\- ]+";

/// Message reported when an employed user's age is outside the working range.
pub const EMPLOYMENT_AGE_MESSAGE: &str = "age must be between 18 and 65 years";

/// Demonstration batch of five raw user records, as a JSON array.
///
/// `data/user_schema.yml` next to it is the declarative form of [`user_schema`].
pub const SAMPLE_USERS_JSON: &str = include_str!("../data/sample_users.json");

/// Postal address: city, street and house number.
pub fn address_schema() -> Result<SchemaNode> {
    SchemaBuilder::new("Address")
        .field(
            FieldBuilder::string("city")
                .description("City name, at least 2 characters")
                .min_length(2)
                .build(),
        )
        .field(
            FieldBuilder::string("street")
                .description("Street name, at least 3 characters")
                .min_length(3)
                .build(),
        )
        .field(
            FieldBuilder::integer("house_number")
                .description("Positive house number")
                .min_value(1.0)
                .build(),
        )
        .build()
}

/// Employed users must be between 18 and 65 years old.
///
/// Reported against `age`. A missing `age` or `is_employed` leaves the rule
/// untriggered so only the per-field `missing` error is produced.
pub fn employment_age_rule() -> CrossFieldRule {
    CrossFieldRule::range_when(
        "employment_age",
        "is_employed",
        "age",
        18.0,
        65.0,
        EMPLOYMENT_AGE_MESSAGE,
    )
}

/// User record with a nested [`address_schema`].
pub fn user_schema() -> Result<SchemaNode> {
    SchemaBuilder::new("User")
        .field(
            FieldBuilder::string("name")
                .description("Full name, Latin or Cyrillic letters")
                .min_length(2)
                .max_length(120)
                .pattern(Pattern::new(NAME_PATTERN)?)
                .build(),
        )
        .field(
            FieldBuilder::integer("age")
                .description("Age in years, between 0 and 65")
                .min_value(0.0)
                .max_value(65.0)
                .build(),
        )
        .field(FieldBuilder::string("email").email().build())
        .field(FieldBuilder::boolean("is_employed").build())
        .nested("address", address_schema()?)
        .rule(employment_age_rule())
        .build()
}
