// tests/common/mod.rs
#![allow(dead_code)]

use fiql_predicate::{
    Evaluator, Predicate, PredicateVisitor, VisitorConfig,
    model::{AttributeType, EntityType, Schema},
};
use serde_json::{Value as Json, json};

pub fn pet_schema() -> Schema {
    Schema::new()
        .register(
            EntityType::new("Owner")
                .attribute("firstName", AttributeType::String)
                .attribute("lastName", AttributeType::String),
        )
        .register(
            EntityType::new("Visit")
                .attribute("date", AttributeType::DateTime)
                .attribute(
                    "type",
                    AttributeType::enumeration("VisitType", ["SCHEDULED", "CANCELLED", "DONE"]),
                )
                .attribute("description", AttributeType::String),
        )
        .register(
            EntityType::new("Pet")
                .attribute("name", AttributeType::String)
                .attribute("birthDate", AttributeType::Date)
                .attribute("weight", AttributeType::Double)
                .attribute("vaccinated", AttributeType::Boolean)
                .attribute("owner", AttributeType::entity("Owner"))
                .collection("nicknames", AttributeType::String)
                .collection("visits", AttributeType::entity("Visit")),
        )
}

/// Selectors exposed to queries; "unknown" is allowed but names no attribute.
pub fn pet_config() -> VisitorConfig {
    VisitorConfig::new([
        "nicknames",
        "owner.firstName",
        "name",
        "visits",
        "visits.type",
        "visits.date",
        "birthDate",
        "weight",
        "vaccinated",
        "unknown",
        "born",
    ])
    .alias("born", "birthDate")
}

pub fn pets() -> Vec<Json> {
    vec![
        json!({
            "name": "Leo",
            "birthDate": "2010-09-07",
            "weight": 4.5,
            "vaccinated": true,
            "owner": {"firstName": "George", "lastName": "Franklin"},
            "nicknames": [],
            "visits": []
        }),
        json!({
            "name": "Basil",
            "birthDate": "2012-08-06",
            "weight": 2.1,
            "vaccinated": false,
            "owner": {"firstName": "Betty", "lastName": "Davis"},
            "nicknames": ["Bas"],
            "visits": [
                {"date": "2013-01-02T10:00:00Z", "type": "CANCELLED", "description": "rabies shot"}
            ]
        }),
        json!({
            "name": "Max",
            "birthDate": "2012-09-04",
            "weight": 12.0,
            "vaccinated": true,
            "owner": {"firstName": "Jean", "lastName": "Coleman"},
            "nicknames": ["Maxi", "Maximus"],
            "visits": [
                {"date": "2013-01-01T09:00:00Z", "type": "SCHEDULED", "description": "rabies shot"},
                {"date": "2013-01-04T09:15:00Z", "type": "SCHEDULED", "description": "neutered"}
            ]
        }),
        json!({
            "name": "Chuck",
            "birthDate": "2011-08-06",
            "weight": 7.25,
            "vaccinated": null,
            "owner": {"firstName": "Jeff", "lastName": "Black"},
            "nicknames": ["Chucky"],
            "visits": [
                {"date": "2013-01-03T14:30:00Z", "type": "DONE", "description": "spayed"},
                {"date": "2013-02-01T08:00:00Z", "type": "SCHEDULED", "description": "checkup"}
            ]
        }),
        json!({
            "name": "Lucky",
            "birthDate": "2013-03-01",
            "weight": 3.0,
            "vaccinated": false,
            "owner": {"firstName": "Jeff", "lastName": "Black"},
            "nicknames": ["Lucky Lou"],
            "visits": []
        }),
    ]
}

pub fn compile(query: &str) -> Predicate {
    compile_with(query, &pet_config())
}

pub fn compile_with(query: &str, config: &VisitorConfig) -> Predicate {
    let schema = pet_schema();
    PredicateVisitor::new(&schema, "Pet")
        .compile(query, config)
        .unwrap()
}

/// Names of the pets selected by `query`, in fixture order.
pub fn names(query: &str) -> Vec<String> {
    names_with(query, &pet_config())
}

pub fn names_with(query: &str, config: &VisitorConfig) -> Vec<String> {
    let predicate = compile_with(query, config);
    let records = pets();
    Evaluator::new()
        .filter(&predicate, &records)
        .unwrap()
        .into_iter()
        .map(|pet| pet["name"].as_str().unwrap().to_string())
        .collect()
}
