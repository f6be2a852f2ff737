use sql_query_tester::{
    query::QueryType,
    validator::{DANGEROUS_OPERATIONS, UNKNOWN_QUERY_TYPE, validate}
};

#[test]
fn test_select_is_valid() {
    let result = validate("SELECT * FROM users WHERE id = 1");
    assert!(result.is_valid);
    assert_eq!(result.query_type, Some(QueryType::Select));
    assert!(result.issues.is_empty());
}

#[test]
fn test_classification_ignores_case_and_whitespace() {
    assert_eq!(validate("   insert into t values (1)").query_type, Some(QueryType::Insert));
    assert_eq!(validate("\n\tUpdate t SET a = 1").query_type, Some(QueryType::Update));
    assert_eq!(validate("delete from t").query_type, Some(QueryType::Delete));
}

#[test]
fn test_drop_table_reports_both_issues_in_order() {
    let result = validate("DROP TABLE users");
    assert!(!result.is_valid);
    assert_eq!(result.query_type, None);
    assert_eq!(result.issues.as_slice(), [UNKNOWN_QUERY_TYPE, DANGEROUS_OPERATIONS]);
}

#[test]
fn test_dangerous_keyword_inside_select() {
    let result = validate("SELECT * FROM t; DROP TABLE t");
    assert!(!result.is_valid);
    assert_eq!(result.query_type, Some(QueryType::Select));
    assert_eq!(result.issues.as_slice(), [DANGEROUS_OPERATIONS]);
}

#[test]
fn test_keyword_substring_is_flagged() {
    let result = validate("SELECT backdrop FROM scenes");
    assert!(!result.is_valid);
    assert_eq!(result.issues.as_slice(), [DANGEROUS_OPERATIONS]);
}

#[test]
fn test_truncate_is_flagged() {
    let result = validate("truncate table logs");
    assert_eq!(result.issues.len(), 2);
}

#[test]
fn test_unknown_statement() {
    let result = validate("CREATE TABLE t (id INT)");
    assert!(!result.is_valid);
    assert_eq!(result.query_type, None);
    assert_eq!(result.issues.as_slice(), [UNKNOWN_QUERY_TYPE]);
}

#[test]
fn test_empty_query_is_unknown() {
    let result = validate("   ");
    assert!(!result.is_valid);
    assert_eq!(result.issues.as_slice(), [UNKNOWN_QUERY_TYPE]);
}

#[test]
fn test_validation_is_idempotent() {
    for query in ["SELECT 1", "DROP TABLE x", "", "update t set a = 1"] {
        assert_eq!(validate(query), validate(query));
    }
}

#[test]
fn test_is_valid_matches_issues() {
    for query in ["SELECT 1", "DROP TABLE x", "WITH a AS (SELECT 1) SELECT * FROM a"] {
        let result = validate(query);
        assert_eq!(result.is_valid, result.issues.is_empty());
    }
}

#[test]
fn test_serializes_unknown_type_as_null() {
    let json = serde_json::to_value(validate("DROP TABLE users")).unwrap();
    assert_eq!(json["query_type"], serde_json::Value::Null);
    assert_eq!(json["is_valid"], false);

    let json = serde_json::to_value(validate("SELECT 1")).unwrap();
    assert_eq!(json["query_type"], "SELECT");
}
