use ontology_engine::{DataValidator, EngineError, ErrorKind, FieldErrorKind};
use ontology_model::{DataType, SchemaLoader, SchemaParser};
use ontology_types::{Fields, Numeric};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;

const SCHEMA: &str = r#"
version: "1.0"
object_types:
  - name: Person
    properties:
      - name: name
        data_type: string
        required: true
        constraints: { min_length: 2, max_length: 5, pattern: "^[A-Z]" }
      - name: age
        data_type: int
        constraints: { min: 0, max: 150 }
      - name: height
        data_type: float
        constraints: { min: 0.5, max: 2.5 }
      - name: active
        data_type: bool
      - name: born
        data_type: date
      - name: seen
        data_type: datetime
      - name: tags
        data_type: array<string>
      - name: extra
        data_type: json
      - name: status
        data_type: string
        required: true
        default_value: active
        constraints: { enum: [active, retired] }
      - name: level
        data_type: int
        default_value: 1
        constraints: { enum: [1, 2, 3] }
  - name: Company
    properties:
      - name: name
        data_type: string
link_types:
  - name: WorksAt
    source_type: Person
    target_type: Company
    cardinality: many-to-one
    direction: directed
    properties:
      - name: role
        data_type: string
        required: true
      - name: since
        data_type: date
        default_value: "2020-01-01"
"#;

fn validator() -> DataValidator {
    let loader = SchemaLoader::new(SchemaParser::from_yaml(SCHEMA));
    loader.load().unwrap();
    DataValidator::new(Arc::new(loader))
}

fn fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

fn field_error(result: Result<(), EngineError>) -> (String, FieldErrorKind) {
    match result {
        Err(EngineError::Field(e)) => (e.field, e.kind),
        other => panic!("expected a field error, got {other:?}"),
    }
}

fn check(data: Value) -> Result<(), EngineError> {
    let mut data = fields(data);
    validator().validate_instance_data("Person", &mut data)
}

#[test]
fn valid_instance_passes_and_gets_defaults() {
    let mut data = fields(json!({
        "name": "Ada",
        "age": 36,
        "height": 1,
        "active": true,
        "born": "1815-12-10",
        "seen": "2024-05-01T10:00:00+02:00",
        "tags": ["math", 1],
        "extra": {"anything": [null]}
    }));
    validator().validate_instance_data("Person", &mut data).unwrap();
    assert_eq!(data["status"], json!("active"));
    assert_eq!(data["level"], json!(1));
}

#[test]
fn explicit_values_are_not_replaced_by_defaults() {
    let mut data = fields(json!({"name": "Ada", "status": "retired", "level": 3}));
    validator().validate_instance_data("Person", &mut data).unwrap();
    assert_eq!(data["status"], json!("retired"));
    assert_eq!(data["level"], json!(3));
}

#[test]
fn missing_required_without_default() {
    let (field, kind) = field_error(check(json!({"age": 3})));
    assert_eq!(field, "name");
    assert_eq!(kind, FieldErrorKind::MissingRequired);
}

#[test]
fn unknown_type_is_not_found() {
    let err = validator()
        .validate_instance_data("Robot", &mut Fields::new())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn age_out_of_range() {
    let (field, kind) = field_error(check(json!({"name": "Ada", "age": 200})));
    assert_eq!(field, "age");
    assert_eq!(kind, FieldErrorKind::AboveMaximum { max: Numeric::Int(150) });

    let (_, kind) = field_error(check(json!({"name": "Ada", "age": -1})));
    assert_eq!(kind, FieldErrorKind::BelowMinimum { min: Numeric::Int(0) });

    check(json!({"name": "Ada", "age": 40})).unwrap();
    check(json!({"name": "Ada", "age": 150})).unwrap();
}

#[test]
fn int_accepts_integral_floats_only() {
    check(json!({"name": "Ada", "age": 40.0})).unwrap();
    let (_, kind) = field_error(check(json!({"name": "Ada", "age": 40.5})));
    assert!(matches!(kind, FieldErrorKind::TypeMismatch { .. }));
    let (_, kind) = field_error(check(json!({"name": "Ada", "age": "40"})));
    assert!(matches!(kind, FieldErrorKind::TypeMismatch { .. }));
}

#[test]
fn float_bounds_compare_across_representations() {
    check(json!({"name": "Ada", "height": 2})).unwrap();
    let (field, kind) = field_error(check(json!({"name": "Ada", "height": 3})));
    assert_eq!(field, "height");
    assert!(matches!(kind, FieldErrorKind::AboveMaximum { .. }));
    let (_, kind) = field_error(check(json!({"name": "Ada", "height": 0.1})));
    assert!(matches!(kind, FieldErrorKind::BelowMinimum { .. }));
}

#[test]
fn string_length_counts_characters() {
    // Five characters, more than five bytes.
    check(json!({"name": "Zoëëë"})).unwrap();
    let (_, kind) = field_error(check(json!({"name": "A"})));
    assert_eq!(kind, FieldErrorKind::TooShort { min: 2 });
    let (_, kind) = field_error(check(json!({"name": "Abcdef"})));
    assert_eq!(kind, FieldErrorKind::TooLong { max: 5 });
}

#[test]
fn pattern_must_match() {
    let (field, kind) = field_error(check(json!({"name": "ada"})));
    assert_eq!(field, "name");
    assert!(matches!(kind, FieldErrorKind::PatternMismatch { .. }));
}

#[test]
fn scalar_types_are_checked() {
    let cases = [
        (json!({"name": 5}), "name"),
        (json!({"name": "Ada", "active": "yes"}), "active"),
        (json!({"name": "Ada", "tags": "math"}), "tags"),
        (json!({"name": "Ada", "height": "tall"}), "height"),
    ];
    for (data, expected) in cases {
        let (field, kind) = field_error(check(data));
        assert_eq!(field, expected);
        assert!(matches!(kind, FieldErrorKind::TypeMismatch { .. }), "{kind:?}");
    }
}

#[test]
fn dates_and_datetimes_are_parsed() {
    let (field, kind) = field_error(check(json!({"name": "Ada", "born": "10/12/1815"})));
    assert_eq!(field, "born");
    assert_eq!(kind, FieldErrorKind::InvalidFormat { expected: "YYYY-MM-DD" });

    let (_, kind) = field_error(check(json!({"name": "Ada", "born": "1815-02-30"})));
    assert!(matches!(kind, FieldErrorKind::InvalidFormat { .. }));

    let (field, _) = field_error(check(json!({"name": "Ada", "seen": "2024-05-01 10:00"})));
    assert_eq!(field, "seen");

    let (_, kind) = field_error(check(json!({"name": "Ada", "born": 1815})));
    assert!(matches!(kind, FieldErrorKind::TypeMismatch { .. }));
}

#[test]
fn enum_membership_reports_allowed_values() {
    let (field, kind) = field_error(check(json!({"name": "Ada", "status": "gone"})));
    assert_eq!(field, "status");
    assert_eq!(
        kind,
        FieldErrorKind::NotInEnum {
            allowed: vec![json!("active"), json!("retired")]
        }
    );
    assert_eq!(kind.to_string(), "value must be one of: active, retired");
}

#[test]
fn enum_uses_loose_numeric_equality() {
    check(json!({"name": "Ada", "level": 2.0})).unwrap();
    let (_, kind) = field_error(check(json!({"name": "Ada", "level": 4})));
    assert!(matches!(kind, FieldErrorKind::NotInEnum { .. }));
}

#[test]
fn link_requires_endpoints() {
    let v = validator();
    let mut props = fields(json!({"role": "engineer"}));

    let (field, kind) = field_error(v.validate_link_data("WorksAt", "", "c1", &mut props));
    assert_eq!(field, "source_id");
    assert_eq!(kind, FieldErrorKind::MissingRequired);

    let (field, _) = field_error(v.validate_link_data("WorksAt", "p1", "", &mut props));
    assert_eq!(field, "target_id");

    v.validate_link_data("WorksAt", "p1", "c1", &mut props).unwrap();
    assert_eq!(props["since"], json!("2020-01-01"));
}

#[test]
fn link_properties_are_validated() {
    let v = validator();
    let (field, kind) = field_error(v.validate_link_data("WorksAt", "p1", "c1", &mut Fields::new()));
    assert_eq!(field, "role");
    assert_eq!(kind, FieldErrorKind::MissingRequired);

    let mut props = fields(json!({"role": "dev", "since": "yesterday"}));
    let (field, _) = field_error(v.validate_link_data("WorksAt", "p1", "c1", &mut props));
    assert_eq!(field, "since");

    let err = v
        .validate_link_data("Owns", "p1", "c1", &mut Fields::new())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn patch_checks_only_present_fields() {
    let v = validator();
    v.validate_instance_patch("Person", &fields(json!({"age": 41}))).unwrap();
    v.validate_instance_patch("Person", &Fields::new()).unwrap();
    v.validate_instance_patch("Person", &fields(json!({"nickname": 5}))).unwrap();

    let (field, _) = field_error(v.validate_instance_patch("Person", &fields(json!({"age": 999}))));
    assert_eq!(field, "age");

    v.validate_link_patch("WorksAt", &fields(json!({"since": "2021-03-04"})))
        .unwrap();
    let (field, _) = field_error(v.validate_link_patch("WorksAt", &fields(json!({"role": 1}))));
    assert_eq!(field, "role");
}

#[test]
fn patch_does_not_inject_defaults() {
    let v = validator();
    let patch = fields(json!({"age": 41}));
    v.validate_instance_patch("Person", &patch).unwrap();
    assert!(!patch.contains_key("status"));
}

#[test]
fn convert_value_rules() {
    let convert = DataValidator::convert_value;
    assert_eq!(convert(&DataType::Int, json!("42")).unwrap(), json!(42));
    assert_eq!(convert(&DataType::Int, json!(" -7 ")).unwrap(), json!(-7));
    assert_eq!(convert(&DataType::Int, json!(3.9)).unwrap(), json!(3));
    assert_eq!(convert(&DataType::Int, json!(5)).unwrap(), json!(5));
    assert!(matches!(
        convert(&DataType::Int, json!("4.5")),
        Err(FieldErrorKind::InvalidFormat { .. })
    ));

    assert_eq!(convert(&DataType::Float, json!("1.5")).unwrap(), json!(1.5));
    assert_eq!(convert(&DataType::Float, json!(2)).unwrap(), json!(2.0));
    assert!(convert(&DataType::Float, json!("NaN")).is_err());

    for truthy in ["true", "TRUE", "True", "t", "T", "1"] {
        assert_eq!(convert(&DataType::Bool, json!(truthy)).unwrap(), json!(true));
    }
    for falsy in ["false", "f", "0", "FALSE"] {
        assert_eq!(convert(&DataType::Bool, json!(falsy)).unwrap(), json!(false));
    }
    assert!(convert(&DataType::Bool, json!("yes")).is_err());

    assert_eq!(convert(&DataType::String, json!("42")).unwrap(), json!("42"));
    assert_eq!(convert(&DataType::Date, json!(7)).unwrap(), json!(7));
}
