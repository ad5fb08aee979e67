use ontology_engine::{EngineConfig, ErrorKind, Fields, OntologyEngine, TraversalDirection};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const SCHEMA: &str = r#"
version: "1.0"
namespace: Acme.HR
object_types:
  - name: Person
    properties:
      - name: name
        data_type: string
        required: true
      - name: age
        data_type: int
        constraints: { min: 0, max: 150 }
      - name: active
        data_type: bool
      - name: status
        data_type: string
        required: true
        default_value: active
  - name: Company
    properties:
      - name: name
        data_type: string
        required: true
  - name: 部门
    properties:
      - name: 名称
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
"#;

struct Fixture {
    dir: TempDir,
    schema_path: PathBuf,
    engine: OntologyEngine,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let schema_path = dir.path().join("schema.yaml");
    fs::write(&schema_path, SCHEMA).unwrap();
    let engine = OntologyEngine::open(EngineConfig::new(&schema_path, dir.path().join("data"))).unwrap();
    Fixture {
        dir,
        schema_path,
        engine,
    }
}

fn fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

#[test]
fn open_fails_without_schema() {
    let dir = TempDir::new().unwrap();
    let result = OntologyEngine::open(EngineConfig::new(dir.path().join("missing.yaml"), dir.path()));
    assert_eq!(result.err().map(|e| e.kind()), Some(ErrorKind::Io));
}

#[test]
fn namespace_comes_from_schema_unless_overridden() {
    let fx = fixture();
    assert_eq!(fx.engine.namespace(), "Acme.HR");

    let id = fx
        .engine
        .instances()
        .create("Person", fields(json!({"name": "Ada"})))
        .unwrap();
    let file = fx
        .dir
        .path()
        .join("data")
        .join("acme_hr")
        .join("person")
        .join(format!("{id}.json"));
    assert!(file.is_file());

    let config = EngineConfig::new(&fx.schema_path, fx.dir.path().join("data")).with_namespace("tenant");
    let other = OntologyEngine::open(config).unwrap();
    assert_eq!(other.namespace(), "tenant");
    assert_eq!(other.instances().list("Person", 0, 20, &Fields::new()).unwrap().total, 0);
}

#[test]
fn age_200_is_rejected_and_age_40_accepted() {
    let fx = fixture();
    let instances = fx.engine.instances();

    let err = instances
        .create("Person", fields(json!({"name": "Old", "age": 200})))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FieldValidation);
    assert_eq!(err.field(), Some("age"));
    assert!(err.to_string().contains("<= 150"));

    let id = instances
        .create("Person", fields(json!({"name": "Ada", "age": 40})))
        .unwrap();
    let stored = instances.get("Person", &id.to_string()).unwrap();
    assert_eq!(stored.get("age"), Some(&json!(40)));
}

#[test]
fn required_default_is_stored() {
    let fx = fixture();
    let instances = fx.engine.instances();
    let id = instances
        .create("Person", fields(json!({"name": "Ada"})))
        .unwrap()
        .to_string();
    assert_eq!(instances.get("Person", &id).unwrap().get_str("status"), Some("active"));
}

#[test]
fn works_at_needs_a_source() {
    let fx = fixture();
    let err = fx
        .engine
        .links()
        .create("WorksAt", "", "c1", Fields::new())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FieldValidation);
    assert_eq!(err.field(), Some("source_id"));
}

#[test]
fn unknown_types_are_not_found() {
    let fx = fixture();
    let instances = fx.engine.instances();
    let links = fx.engine.links();

    for err in [
        instances.create("Robot", Fields::new()).unwrap_err(),
        instances.get("Robot", "x").unwrap_err(),
        instances.list("Robot", 0, 20, &Fields::new()).unwrap_err(),
        links.list("Owns", 0, 20).unwrap_err(),
        links.create("Owns", "a", "b", Fields::new()).unwrap_err(),
    ] {
        assert_eq!(err.kind(), ErrorKind::NotFound, "{err}");
    }
}

#[test]
fn update_is_a_validated_merge() {
    let fx = fixture();
    let instances = fx.engine.instances();
    let id = instances
        .create("Person", fields(json!({"name": "Ada", "age": 36, "status": "retired"})))
        .unwrap()
        .to_string();
    let before = instances.get("Person", &id).unwrap();

    let err = instances
        .update("Person", &id, fields(json!({"age": "old"})))
        .unwrap_err();
    assert_eq!(err.field(), Some("age"));

    let updated = instances
        .update("Person", &id, fields(json!({"age": 37})))
        .unwrap();
    assert_eq!(updated.get("age"), Some(&json!(37)));
    assert_eq!(updated.get_str("name"), Some("Ada"));
    // Partial updates do not reset fields to their defaults.
    assert_eq!(updated.get_str("status"), Some("retired"));
    assert!(updated.updated_at().unwrap() >= before.updated_at().unwrap());

    let missing = instances
        .update("Person", "0c4f6f5e-0000-4000-8000-000000000000", Fields::new())
        .unwrap_err();
    assert_eq!(missing.kind(), ErrorKind::NotFound);
}

#[test]
fn delete_twice_is_not_found() {
    let fx = fixture();
    let instances = fx.engine.instances();
    let id = instances
        .create("Person", fields(json!({"name": "Ada"})))
        .unwrap()
        .to_string();
    instances.delete("Person", &id).unwrap();
    assert_eq!(instances.get("Person", &id).unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(instances.delete("Person", &id).unwrap_err().kind(), ErrorKind::NotFound);
}

#[test]
fn filtered_listing_paginates_matches() {
    let fx = fixture();
    let instances = fx.engine.instances();
    for (name, age) in [("A", 30), ("B", 40), ("C", 40), ("D", 40), ("E", 50)] {
        instances
            .create("Person", fields(json!({"name": name, "age": age})))
            .unwrap();
    }

    let all = instances.list("Person", 0, 2, &Fields::new()).unwrap();
    assert_eq!(all.items.len(), 2);
    assert_eq!(all.total, 5);

    let raw = fields(json!({"age": "40"}));
    let filters = instances.coerce_filters("Person", raw).unwrap();
    assert_eq!(filters["age"], json!(40));

    let page = instances.list("Person", 1, 10, &filters).unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 2);
    assert!(page.items.iter().all(|r| r.get("age") == Some(&json!(40))));

    let empty = instances.list("Person", 3, 10, &filters).unwrap();
    assert!(empty.items.is_empty());
    assert_eq!(empty.total, 3);

    assert_eq!(instances.search("Person", &filters).unwrap().len(), 3);
}

#[test]
fn coerce_filters_reports_bad_values() {
    let fx = fixture();
    let instances = fx.engine.instances();

    let filters = instances
        .coerce_filters("Person", fields(json!({"active": "t", "name": "Ada", "id": "x"})))
        .unwrap();
    assert_eq!(filters["active"], json!(true));
    assert_eq!(filters["name"], json!("Ada"));
    assert_eq!(filters["id"], json!("x"));

    let err = instances
        .coerce_filters("Person", fields(json!({"age": "forty"})))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FieldValidation);
    assert_eq!(err.field(), Some("age"));
}

#[test]
fn connected_instances_follow_direction() {
    let fx = fixture();
    let instances = fx.engine.instances();
    let links = fx.engine.links();

    let ada = instances
        .create("Person", fields(json!({"name": "Ada"})))
        .unwrap()
        .to_string();
    let acme = instances
        .create("Company", fields(json!({"name": "Acme"})))
        .unwrap()
        .to_string();
    let globex = instances
        .create("Company", fields(json!({"name": "Globex"})))
        .unwrap()
        .to_string();

    links
        .create("WorksAt", &ada, &acme, fields(json!({"role": "engineer"})))
        .unwrap();
    links.create("WorksAt", &ada, &globex, Fields::new()).unwrap();
    // Dangling endpoint: skipped during traversal.
    links
        .create("WorksAt", &ada, "00000000-0000-4000-8000-000000000000", Fields::new())
        .unwrap();

    let mut employers: Vec<String> = links
        .connected_instances("Person", "WorksAt", &ada, TraversalDirection::Outgoing)
        .unwrap()
        .iter()
        .map(|r| r.get_str("name").unwrap().to_string())
        .collect();
    employers.sort();
    assert_eq!(employers, vec!["Acme", "Globex"]);

    let staff = links
        .connected_instances("Company", "WorksAt", &acme, TraversalDirection::Incoming)
        .unwrap();
    assert_eq!(staff.len(), 1);
    assert_eq!(staff[0].get_str("name"), Some("Ada"));

    // Wrong end of the link for the direction.
    assert!(links
        .connected_instances("Company", "WorksAt", &acme, TraversalDirection::Outgoing)
        .unwrap()
        .is_empty());
    assert!(links
        .connected_instances("Person", "WorksAt", &ada, TraversalDirection::Incoming)
        .unwrap()
        .is_empty());

    assert_eq!(links.by_source("WorksAt", &ada).unwrap().len(), 3);
    assert_eq!(links.by_target("WorksAt", &acme).unwrap().len(), 1);
}

#[test]
fn link_update_keeps_endpoints() {
    let fx = fixture();
    let links = fx.engine.links();
    let id = links
        .create("WorksAt", "p1", "c1", fields(json!({"role": "engineer"})))
        .unwrap()
        .to_string();

    let updated = links
        .update("WorksAt", &id, fields(json!({"role": "manager", "source_id": "p9"})))
        .unwrap();
    assert_eq!(updated.get_str("role"), Some("manager"));
    assert_eq!(updated.source_id(), Some("p1"));

    let err = links
        .update("WorksAt", &id, fields(json!({"role": 7})))
        .unwrap_err();
    assert_eq!(err.field(), Some("role"));

    links.delete("WorksAt", &id).unwrap();
    assert_eq!(links.get("WorksAt", &id).unwrap_err().kind(), ErrorKind::NotFound);
}

#[test]
fn updating_a_missing_record_reports_not_found_before_field_errors() {
    let fx = fixture();
    let missing = "0c4f6f5e-0000-4000-8000-000000000000";

    let err = fx
        .engine
        .links()
        .update("WorksAt", missing, fields(json!({"role": 7})))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.field(), None);

    let err = fx
        .engine
        .instances()
        .update("Person", missing, fields(json!({"age": "old"})))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn non_ascii_types_round_trip() {
    let fx = fixture();
    let instances = fx.engine.instances();
    let id = instances
        .create("部门", fields(json!({"名称": "研发"})))
        .unwrap()
        .to_string();
    assert_eq!(instances.get("部门", &id).unwrap().get_str("名称"), Some("研发"));
}

#[test]
fn direction_parsing() {
    assert_eq!("".parse::<TraversalDirection>().unwrap(), TraversalDirection::Outgoing);
    assert_eq!(
        "incoming".parse::<TraversalDirection>().unwrap(),
        TraversalDirection::Incoming
    );
    let err = "sideways".parse::<TraversalDirection>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);
    assert_eq!(TraversalDirection::default(), TraversalDirection::Outgoing);
}

#[test]
fn reload_swaps_schema_and_keeps_it_on_failure() {
    let fx = fixture();
    let schema = fx.engine.schema();
    assert_eq!(schema.object_types().unwrap().len(), 3);
    assert_eq!(schema.outgoing_links("Person").unwrap()[0].name, "WorksAt");
    assert_eq!(schema.incoming_links("Company").unwrap()[0].name, "WorksAt");
    assert_eq!(schema.object_type_properties("Person").unwrap().len(), 4);

    fs::write(&fx.schema_path, "version: \"2\"\nobject_types: [{name: 2bad}]\n").unwrap();
    let err = fx.engine.reload_schema().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(schema.snapshot().unwrap().version, "1.0");

    let extended = SCHEMA.replace(
        "  - name: Company\n",
        "  - name: Robot\n    properties: []\n  - name: Company\n",
    );
    fs::write(&fx.schema_path, extended).unwrap();
    let reloaded = fx.engine.reload_schema().unwrap();
    assert_eq!(reloaded.object_types.len(), 4);
    fx.engine
        .instances()
        .create("Robot", Fields::new())
        .unwrap();
    assert_eq!(fx.engine.schema().link_type("WorksAt").unwrap().source_type, "Person");
}
