use super::HeaderMap;

const fn is_send_sync<T: Send + Sync>() {}
const _: () = {
    is_send_sync::<HeaderMap>();
};

#[test]
fn insert_replaces_by_name() {
    let mut map = HeaderMap::new();

    assert!(map.insert("Content-Type", "text/html").is_none());
    assert_eq!(map.len(), 1);

    let replaced = map.insert("content-type", "text/plain");
    assert!(matches!(replaced, Some(v) if v == "text/html"));
    assert_eq!(map.len(), 1);

    assert!(matches!(map.get("CONTENT-TYPE"), Some(v) if *v == "text/plain"));
}

#[test]
fn remove_by_name() {
    let mut map = HeaderMap::new();
    map.insert("a", "1");
    map.insert("b", "2");

    assert!(matches!(map.remove("A"), Some(v) if v == "1"));
    assert!(!map.contains("a"));
    assert!(map.contains("b"));
    assert!(map.remove("a").is_none());
}

#[test]
fn from_iter_keeps_names_unique() {
    let map = HeaderMap::from_iter([("a", "1"), ("b", "2"), ("A", "3")]);

    assert_eq!(map.len(), 2);
    assert!(matches!(map.get("a"), Some(v) if *v == "3"));
    assert!(matches!(map.get("b"), Some(v) if *v == "2"));
}

#[test]
fn empty_names_accepted() {
    let mut map = HeaderMap::new();
    map.insert("", "anything");

    assert_eq!(map.len(), 1);
    assert!(map.contains(""));
}
