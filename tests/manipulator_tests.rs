use jsonsubst::replace_value;
use serde_json::{json, Value};
use yare::parameterized;

fn base_json() -> Value {
    json!({
        "name": "api",
        "version": "2",
        "port": 80,
        "enabled": true,
        "missing": null,
        "server": {
            "hosts": ["localhost", "127.0.0.1"],
            "tls": {"cert": "/etc/cert.pem"}
        },
        "matrix": [[1, 2], [3, 4]],
        "listeners": [{"port": 80}, {"port": 443}],
        "spring.profiles": "dev"
    })
}

#[parameterized(
    root_string = { "name", json!("web"), "/name", json!("web") },
    root_number = { "port", json!(8080), "/port", json!(8080) },
    root_bool = { "enabled", json!(false), "/enabled", json!(false) },
    null_counts_as_existing = { "missing", json!("now set"), "/missing", json!("now set") },
    nested_object = { "server.tls.cert", json!("/run/cert.pem"), "/server/tls/cert", json!("/run/cert.pem") },
    array_element = { "server.hosts.1", json!("10.0.0.1"), "/server/hosts/1", json!("10.0.0.1") },
    nested_arrays = { "matrix.1.0", json!(30), "/matrix/1/0", json!(30) },
    object_in_array = { "listeners.1.port", json!(8443), "/listeners/1/port", json!(8443) },
    escaped_dot = { "spring\\.profiles", json!("prod"), "/spring.profiles", json!("prod") },
    string_keeps_type = { "version", json!(3), "/version", json!("3") },
    string_keeps_type_bool = { "name", json!(true), "/name", json!("true") },
    string_keeps_type_null = { "name", json!(null), "/name", json!("null") },
    array_element_is_not_string_preserved = { "server.hosts.0", json!(1), "/server/hosts/0", json!(1) },
    terminal_object_is_overwritten = { "server.tls", json!(false), "/server/tls", json!(false) },
    terminal_array_is_overwritten = { "matrix", json!(null), "/matrix", json!(null) },
    scalar_before_path_ends = { "port.number", json!(9000), "/port", json!(9000) },
)]
fn test_replace_value_ok(path: &str, value: Value, pointer: &str, expected: Value) {
    let mut json_obj = base_json();

    assert!(replace_value(&mut json_obj, path, &value));
    assert_eq!(json_obj.pointer(pointer), Some(&expected));

    let mut untouched = base_json();
    *untouched.pointer_mut(pointer).unwrap() = expected;
    assert_eq!(json_obj, untouched, "only {pointer} should change");
}

#[parameterized(
    empty_path = { "" },
    doubled_dot = { "server..hosts" },
    trailing_dot = { "name." },
    missing_root_key = { "nothing" },
    missing_nested_key = { "server.tls.key" },
    missing_intermediate = { "server.proxy.port" },
    index_out_of_bounds = { "server.hosts.2" },
    non_numeric_index = { "server.hosts.first" },
    negative_index = { "server.hosts.-1" },
    padded_index = { "server.hosts.01" },
    signed_index = { "server.hosts.+1" },
    into_array_element_scalar = { "server.hosts.0.name" },
    unescaped_dotted_key = { "spring.profiles" },
    key_on_array = { "listeners.port" },
)]
fn test_replace_value_not_found(path: &str) {
    let mut json_obj = base_json();

    assert!(!replace_value(&mut json_obj, path, &json!("new")));
    assert_eq!(json_obj, base_json());
}

#[parameterized(
    string = { json!("text") },
    number = { json!(1) },
    null = { json!(null) },
)]
fn test_replace_value_on_scalar_root(root: Value) {
    let mut json_obj = root.clone();

    assert!(!replace_value(&mut json_obj, "key", &json!("new")));
    assert_eq!(json_obj, root);
}

#[test]
fn test_replace_value_on_array_root() {
    let mut json_obj = json!(["a", {"b": "c"}]);

    assert!(replace_value(&mut json_obj, "1.b", &json!("d")));
    assert!(replace_value(&mut json_obj, "0", &json!(0)));
    assert_eq!(json_obj, json!([0, {"b": "d"}]));
}

#[test]
fn test_replace_value_preserves_key_order() {
    let mut json_obj = json!({"z": 1, "a": 2, "m": 3});

    assert!(replace_value(&mut json_obj, "a", &json!(20)));
    let keys: Vec<_> = json_obj.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, ["z", "a", "m"]);
}
