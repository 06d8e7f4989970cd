use serde_json::json;
use uql::{DecoderConfig, Response};
use uql_render::{render_response, TableConfig};

fn render(body: serde_json::Value) -> String {
    let response = Response::decode(body.to_string(), &DecoderConfig::default()).unwrap();
    assert!(!response.has_errors());
    render_response(&response, &TableConfig::default())
}

#[test]
fn test_header_wider_than_value() {
    let output = render(json!([
        {"type": "model", "model": {"name": "m:main", "fields": [
            {"alias": "environment", "type": "string"}]}},
        {"type": "data", "model": {"$jsonPath": "$", "$model": "m:main"},
         "dataset": "d:main", "data": [["prod"]]}
    ]));

    assert_eq!(
        output,
        concat!(
            " environment \n",
            "=============\n",
            " prod        \n",
            "-------------\n",
        )
    );
}

#[test]
fn test_value_wider_than_header() {
    let output = render(json!([
        {"type": "model", "model": {"name": "m:main", "fields": [
            {"alias": "env", "type": "string"}]}},
        {"type": "data", "model": {"$jsonPath": "$", "$model": "m:main"},
         "dataset": "d:main", "data": [["production"]]}
    ]));

    assert_eq!(
        output,
        concat!(
            " env        \n",
            "============\n",
            " production \n",
            "------------\n",
        )
    );
}

#[test]
fn test_parent_names_widen_rightmost_child() {
    let output = render(json!([
        {"type": "model", "model": {"name": "m:main", "fields": [
            {"alias": "host", "type": "string"},
            {"alias": "latency_ms", "type": "complex", "model": {"name": "m:latency", "fields": [
                {"alias": "p50", "type": "number"},
                {"alias": "p99", "type": "number"}]}},
            {"alias": "throughput", "type": "complex", "model": {"name": "m:throughput", "fields": [
                {"alias": "rx", "type": "number"},
                {"alias": "tx", "type": "number"}]}}]}},
        {"type": "data", "model": {"$jsonPath": "$", "$model": "m:main"},
         "dataset": "d:main", "data": [
            ["web-1", [[12, 40]], [[100, 200]]],
            ["web-2", [[13, 41]], [[101, 201]]],
            ["db-1", [[20, 90]], [[300, 400]]]]}
    ]));

    assert_eq!(
        output,
        concat!(
            " host  | latency_ms | throughput \n",
            "       | p50 | p99  | rx  | tx   \n",
            "=======+=====+======+=====+======\n",
            " web-1 | 12  | 40   | 100 | 200  \n",
            "-------+-----+------+-----+------\n",
            " web-2 | 13  | 41   | 101 | 201  \n",
            "-------+-----+------+-----+------\n",
            " db-1  | 20  | 90   | 300 | 400  \n",
            "-------+-----+------+-----+------\n",
        )
    );
}

#[test]
fn test_empty_and_populated_references_stay_aligned() {
    let output = render(json!([
        {"type": "model", "model": {"name": "m:main", "fields": [
            {"alias": "id", "type": "string"},
            {"alias": "tags", "type": "complex", "form": "reference",
             "model": {"name": "m:tags", "fields": [{"alias": "tag", "type": "string"}]}},
            {"alias": "attributes", "type": "complex", "form": "reference",
             "model": {"name": "m:attr", "fields": [
                {"alias": "name", "type": "string"},
                {"alias": "value", "type": "string"}]}}]}},
        {"type": "data", "model": {"$jsonPath": "$", "$model": "m:main"},
         "dataset": "d:main", "data": [
            ["a", {"$dataset": "d:tags-1", "$jsonPath": "$"},
                  {"$dataset": "d:attr-1", "$jsonPath": "$"}],
            ["b", {"$dataset": "d:tags-gone", "$jsonPath": "$"},
                  {"$dataset": "d:attr-2", "$jsonPath": "$"}]]},
        {"type": "data", "model": {"$jsonPath": "$", "$model": "m:tags"},
         "dataset": "d:tags-1", "data": []},
        {"type": "data", "model": {"$jsonPath": "$", "$model": "m:attr"},
         "dataset": "d:attr-1", "data": [["k1", "v1"], ["k2", "v2"]]},
        {"type": "data", "model": {"$jsonPath": "$", "$model": "m:attr"},
         "dataset": "d:attr-2", "data": [["k3", "v3"]]}
    ]));

    assert_eq!(
        output,
        concat!(
            " id | tags | attributes   \n",
            "    | tag  | name | value \n",
            "====+======+======+=======\n",
            " a  |      | k1   | v1    \n",
            "    |      |------+-------\n",
            "    |      | k2   | v2    \n",
            "----+------+------+-------\n",
            " b  |      | k3   | v3    \n",
            "----+------+------+-------\n",
        )
    );
}

#[test]
fn test_missing_main_dataset_renders_header_only() {
    let output = render(json!([
        {"type": "model", "model": {"name": "m:main", "fields": [
            {"alias": "id", "type": "string"},
            {"alias": "count", "type": "number"}]}}
    ]));

    assert_eq!(output, " id | count \n====+=======\n            \n----+-------\n");
}

#[test]
fn test_tab_width_is_configurable() {
    let body = json!([
        {"type": "model", "model": {"name": "m:main", "fields": [
            {"alias": "x", "type": "string"}]}},
        {"type": "data", "model": {"$jsonPath": "$", "$model": "m:main"},
         "dataset": "d:main", "data": [["\tz"]]}
    ]);
    let response = Response::decode(body.to_string(), &DecoderConfig::default()).unwrap();

    let output = render_response(&response, &TableConfig::new().tab_width(1));

    assert_eq!(output, " x  \n====\n  z \n----\n");
}

#[test]
fn test_document_without_model_renders_nothing() {
    let output = render(json!([]));
    assert_eq!(output, "");
}

#[test]
fn test_custom_main_dataset_uses_its_own_model() {
    let body = json!([
        {"type": "model", "model": {"name": "m:main", "fields": [
            {"alias": "id", "type": "string"},
            {"alias": "tags", "type": "complex", "form": "reference",
             "model": {"name": "m:tags", "fields": [{"alias": "tag", "type": "string"}]}}]}},
        {"type": "data", "model": {"$jsonPath": "$", "$model": "m:main"},
         "dataset": "d:main", "data": [["a", {"$dataset": "d:tags-1", "$jsonPath": "$"}]]},
        {"type": "data", "model": {"$jsonPath": "$", "$model": "m:tags"},
         "dataset": "d:tags-1", "data": [["prod"], ["eu"]]}
    ]);
    let config = DecoderConfig::new().main_dataset("d:tags-1");
    let response = Response::decode(body.to_string(), &config).unwrap();

    let output = render_response(&response, &TableConfig::default());

    assert_eq!(
        output,
        concat!(
            " tag  \n",
            "======\n",
            " prod \n",
            "------\n",
            " eu   \n",
            "------\n",
        )
    );
}

#[test]
fn test_model_without_fields_renders_nothing() {
    let output = render(json!([
        {"type": "model", "model": {"name": "m:main", "fields": []}},
        {"type": "data", "model": {"$jsonPath": "$", "$model": "m:main"},
         "dataset": "d:main", "data": []}
    ]));
    assert_eq!(output, "");
}
