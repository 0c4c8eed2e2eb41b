//! Self links for API resources
//!
//! A decorated resource serializes as the resource itself plus a `selfURI`
//! field pointing at `<root>/<plural type>/<id>`.

use serde::ser::Error as _;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::registry::TypeCarrier;

const SELF_URI: &str = "selfURI";

/// Something that lives in a collection of its type
pub trait Resource: TypeCarrier + Serialize {
    /// The path segment after the collection name
    fn resource_id(&self) -> String;
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecoratedResource<T> {
    pub data: T,
    pub self_uri: String,
}

impl<T: Resource> DecoratedResource<T> {
    /// Lowercase plural of the type tag, e.g. `users` for `User`
    pub fn resource_name(&self) -> String {
        collection_name(&self.data)
    }
}

impl<T: Serialize> Serialize for DecoratedResource<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut value = serde_json::to_value(&self.data).map_err(S::Error::custom)?;
        match value {
            Value::Object(ref mut fields) => {
                fields.insert(SELF_URI.to_string(), Value::String(self.self_uri.clone()));
            }
            _ => return Err(S::Error::custom("only JSON objects can carry a selfURI")),
        }
        value.serialize(serializer)
    }
}

fn collection_name<T: TypeCarrier + ?Sized>(item: &T) -> String {
    pluralize(&item.type_tag().to_lowercase())
}

/// Decorate with `root_path/<plural type>/<id>`
pub fn decorate<T: Resource>(item: T, root_path: &str) -> DecoratedResource<T> {
    let name = collection_name(&item);
    let id = item.resource_id();
    let root = root_path.trim_end_matches('/');
    let self_uri = if root.is_empty() && !root_path.starts_with('/') {
        format!("{name}/{id}")
    } else {
        format!("{root}/{name}/{id}")
    };
    DecoratedResource {
        data: item,
        self_uri,
    }
}

/// Decorate with a self link under an absolute base URL
///
/// A base that cannot hold a path (`mailto:`) is used as is.
pub fn decorate_with_url<T: Resource>(item: T, root: &url::Url) -> DecoratedResource<T> {
    let name = collection_name(&item);
    let id = item.resource_id();
    let mut link = root.clone();
    if let Ok(mut segments) = link.path_segments_mut() {
        segments.pop_if_empty().push(&name).push(&id);
    }
    DecoratedResource {
        data: item,
        self_uri: link.to_string(),
    }
}

pub fn decorate_all<T, I>(items: I, root_path: &str) -> Vec<DecoratedResource<T>>
where
    T: Resource,
    I: IntoIterator<Item = T>,
{
    items
        .into_iter()
        .map(|item| decorate(item, root_path))
        .collect()
}

/// English plural of a lowercase noun; irregular plurals are not handled
pub fn pluralize(name: &str) -> String {
    const ES_ENDINGS: [&str; 5] = ["ch", "sh", "o", "s", "x"];

    if ES_ENDINGS.iter().any(|ending| name.ends_with(ending)) {
        format!("{name}es")
    } else if let Some(stem) = name.strip_suffix('y') {
        format!("{stem}ies")
    } else if let Some(stem) = name.strip_suffix('f') {
        format!("{stem}ves")
    } else if name.ends_with('z') {
        format!("{name}zes")
    } else {
        format!("{name}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{Identifiable, StringIdentifiable};
    use pretty_assertions::assert_eq;
    use crate::codec::Uuid;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct MockIdentifiable {
        id: Uuid,
    }

    impl TypeCarrier for MockIdentifiable {
        fn type_tag(&self) -> String {
            "MockIdentifiable".to_string()
        }
    }

    impl Identifiable for MockIdentifiable {
        fn id(&self) -> uuid::Uuid {
            self.id.0
        }
    }

    impl Resource for MockIdentifiable {
        fn resource_id(&self) -> String {
            self.id().to_string()
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    #[serde(rename_all = "PascalCase")]
    struct Parcel {
        id: String,
    }

    impl TypeCarrier for Parcel {
        fn type_tag(&self) -> String {
            "box".to_string()
        }
    }

    impl StringIdentifiable for Parcel {
        fn string_id(&self) -> String {
            self.id.clone()
        }
    }

    impl Resource for Parcel {
        fn resource_id(&self) -> String {
            self.string_id()
        }
    }

    #[derive(Debug, Serialize)]
    struct Scalar(u8);

    impl TypeCarrier for Scalar {
        fn type_tag(&self) -> String {
            "scalar".to_string()
        }
    }

    impl Resource for Scalar {
        fn resource_id(&self) -> String {
            self.0.to_string()
        }
    }

    fn boxed(id: &str) -> Parcel {
        Parcel { id: id.to_string() }
    }

    #[test]
    fn pluralize_rules() {
        for (single, plural) in [
            ("cat", "cats"),
            ("bus", "buses"),
            ("box", "boxes"),
            ("party", "parties"),
            ("quiz", "quizzes"),
            ("hero", "heroes"),
            ("potato", "potatoes"),
            ("fish", "fishes"),
            ("church", "churches"),
            ("leaf", "leaves"),
        ] {
            assert_eq!(pluralize(single), plural);
        }
    }

    #[test]
    fn decorate_identifiable() {
        let item = MockIdentifiable { id: Uuid::new_v4() };
        let decorated = decorate(item.clone(), "/api/v1");
        assert_eq!(
            decorated.self_uri,
            format!("/api/v1/mockidentifiables/{}", item.id)
        );
        assert_eq!(decorated.data, item);
        assert_eq!(decorated.resource_name(), "mockidentifiables");
    }

    #[test]
    fn decorate_trims_the_root() {
        assert_eq!(decorate(boxed("abc"), "/api/v1/").self_uri, "/api/v1/boxes/abc");
        assert_eq!(decorate(boxed("abc"), "/").self_uri, "/boxes/abc");
        assert_eq!(decorate(boxed("abc"), "").self_uri, "boxes/abc");
    }

    #[test]
    fn decorate_with_base_url() {
        let root = url::Url::parse("http://localhost:8080/api/v1").unwrap();
        assert_eq!(
            decorate_with_url(boxed("abc"), &root).self_uri,
            "http://localhost:8080/api/v1/boxes/abc"
        );

        let root = url::Url::parse("http://localhost:8080/api/v1/").unwrap();
        assert_eq!(
            decorate_with_url(boxed("a b"), &root).self_uri,
            "http://localhost:8080/api/v1/boxes/a%20b"
        );
    }

    #[test]
    fn decorate_all_items() {
        let decorated = decorate_all(vec![boxed("123"), boxed("456")], "/api/v1");
        let links: Vec<_> = decorated.iter().map(|d| d.self_uri.as_str()).collect();
        assert_eq!(links, vec!["/api/v1/boxes/123", "/api/v1/boxes/456"]);
    }

    #[test]
    fn serializes_with_self_uri() {
        let decorated = decorate(boxed("abc"), "/var/api");
        assert_eq!(
            serde_json::to_value(&decorated).unwrap(),
            json!({"selfURI": "/var/api/boxes/abc", "Id": "abc"})
        );
    }

    #[test]
    fn serializes_identifiable_with_hyphenated_id() {
        let item = MockIdentifiable { id: Uuid::new_v4() };
        let decorated = decorate(item.clone(), "/api");
        assert_eq!(
            serde_json::to_value(&decorated).unwrap(),
            json!({
                "id": item.id.0.to_string(),
                "selfURI": format!("/api/mockidentifiables/{}", item.id.0),
            })
        );
    }

    #[test]
    fn non_objects_cannot_be_decorated() {
        assert!(serde_json::to_string(&decorate(Scalar(7), "/api")).is_err());
    }
}
