//! Tests for the filter tree wire format.

use super::*;
use crate::models;
use serde_json::json;

// ==================== Operator Tests ====================

#[test]
fn test_operator_parse_known_names() {
    assert_eq!(Operator::parse("equals"), Operator::Equals);
    assert_eq!(Operator::parse("notIn"), Operator::NotIn);
    assert_eq!(Operator::parse("startsWith"), Operator::StartsWith);
    assert_eq!(Operator::parse("isNotEmpty"), Operator::IsNotEmpty);
}

#[test]
fn test_operator_parse_is_case_sensitive() {
    assert_eq!(Operator::parse("EQUALS"), Operator::Unknown("EQUALS".to_string()));
    assert!(Operator::parse("Between").is_unknown());
}

#[test]
fn test_operator_round_trips_name() {
    for name in ["equals", "in", "between", "isTrue", "endsWith", "fuzzyMatch"] {
        assert_eq!(Operator::parse(name).as_str(), name);
        assert_eq!(Operator::parse(name).to_string(), name);
    }
}

// ==================== Condition Tests ====================

#[test]
fn test_condition_deserialize() {
    let condition: Condition = serde_json::from_value(json!({
        "field": "amount",
        "operator": "between",
        "value": [100, 200]
    }))
    .unwrap();

    assert_eq!(condition.field, "amount");
    assert_eq!(condition.operator, Operator::Between);
    assert_eq!(condition.value, json!([100, 200]));
}

#[test]
fn test_condition_missing_parts_default() {
    let condition: Condition = serde_json::from_value(json!({})).unwrap();

    assert_eq!(condition.field, "");
    assert!(condition.operator.is_unknown());
    assert_eq!(condition.value, serde_json::Value::Null);
}

#[test]
fn test_condition_unknown_operator_kept() {
    let condition: Condition =
        serde_json::from_value(json!({"field": "name", "operator": "soundsLike", "value": "x"}))
            .unwrap();

    assert_eq!(condition.operator, Operator::Unknown("soundsLike".to_string()));
    let back = serde_json::to_value(&condition).unwrap();
    assert_eq!(back["operator"], json!("soundsLike"));
}

#[test]
fn test_condition_null_operator_is_unknown() {
    let condition: Condition =
        serde_json::from_value(json!({"field": "name", "operator": null})).unwrap();
    assert!(condition.operator.is_unknown());
}

// ==================== Group Tests ====================

#[test]
fn test_group_operator_only_exact_or() {
    let parse = |op: serde_json::Value| {
        serde_json::from_value::<FilterGroup>(json!({"operator": op}))
            .unwrap()
            .operator
    };

    assert_eq!(parse(json!("OR")), GroupOperator::Or);
    assert_eq!(parse(json!("AND")), GroupOperator::And);
    assert_eq!(parse(json!("or")), GroupOperator::And);
    assert_eq!(parse(json!("XOR")), GroupOperator::And);
    assert_eq!(parse(json!(1)), GroupOperator::And);
    assert_eq!(parse(json!(null)), GroupOperator::And);
}

#[test]
fn test_group_defaults() {
    let group: FilterGroup = serde_json::from_value(json!({})).unwrap();
    assert_eq!(group, FilterGroup::all());
    assert!(group.is_empty());

    let group: FilterGroup =
        serde_json::from_value(json!({"conditions": null, "nestedGroups": null})).unwrap();
    assert!(group.is_empty());
}

#[test]
fn test_group_serializes_camel_case() {
    let group = FilterGroup::any()
        .with_condition(Condition::flag("hasNotes", Operator::IsTrue))
        .with_group(FilterGroup::all());

    let json = serde_json::to_value(&group).unwrap();
    assert_eq!(json["operator"], json!("OR"));
    assert_eq!(json["conditions"][0]["operator"], json!("isTrue"));
    assert_eq!(json["nestedGroups"][0]["operator"], json!("AND"));
}

#[test]
fn test_group_condition_count_recurses() {
    let group = FilterGroup::all()
        .with_condition(Condition::flag("hasNotes", Operator::IsTrue))
        .with_group(
            FilterGroup::any()
                .with_condition(Condition::flag("hasTasks", Operator::IsTrue))
                .with_group(
                    FilterGroup::all().with_condition(Condition::flag("missingSize", Operator::IsTrue)),
                ),
        );

    assert_eq!(group.condition_count(), 3);
    assert!(!group.is_empty());
}

#[test]
fn test_unknown_operators_collected_once() {
    let group = FilterGroup::all()
        .with_condition(Condition::new("name", Operator::parse("like"), "a"))
        .with_condition(Condition::new("name", Operator::parse("like"), "b"))
        .with_group(FilterGroup::any().with_condition(Condition::new(
            "amount",
            Operator::parse("near"),
            100,
        )));

    assert_eq!(group.unknown_operators(), vec!["like", "near"]);
}

// ==================== Flat Config Tests ====================

#[test]
fn test_flat_config_compiles_to_runnable_group() {
    let config = FlatFilterConfig::decode(json!({
        "paymentStatus": "unpaid",
        "categories": ["Adult"],
        "hasShirtOrder": true
    }))
    .unwrap();

    let people = vec![
        models::Person::new(1).with("shirtSize", "L"),
        models::Person::new(2).with("shirtSize", "L").with("paid", true),
        models::Person::new(3).with("shirtSize", "TS"),
        models::Person::new(4).with("shirtSize", "No shirt"),
    ];

    let outcome = run_inline(&people, &config.compile(), &models::TaskInfoTable::new());
    let ids: Vec<String> = outcome.results.iter().map(|p| p.id.to_string()).collect();
    assert_eq!(ids, vec!["1"]);
}
