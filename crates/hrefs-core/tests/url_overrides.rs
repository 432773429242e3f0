//! Models that lay out their own URLs instead of asking the resolver.

use hrefs_core::{
    FieldType, Href, HrefError, HrefInput, ModelSchema, Params, PrimaryKey, Referrable,
    ResolveError, Resolver, RouteMatch, coerce_with, register,
};
use serde_json::json;
use std::sync::Arc;

/// Resolver for models that never consult it.
struct Unused;

impl Resolver for Unused {
    fn build_url(&self, view_name: &str, _params: &Params) -> Result<String, ResolveError> {
        Err(ResolveError::UnknownView(view_name.to_string()))
    }

    fn match_url(&self, url: &str) -> Result<RouteMatch, ResolveError> {
        Err(ResolveError::NoMatch {
            url: url.to_string(),
        })
    }
}

struct Volume {
    this: Href<Volume>,
}

impl Referrable for Volume {
    type Key = i64;

    fn schema() -> ModelSchema {
        ModelSchema::new("Volume").details_view("get_volume").key_field(
            "self",
            FieldType::href::<Volume>(),
            PrimaryKey::new().name("id").key_type(FieldType::of::<i64>()),
        )
    }

    fn get_key(&self) -> i64 {
        *self.this.key()
    }

    fn key_to_url(key: &i64, _resolver: &dyn Resolver) -> Result<String, HrefError> {
        let params = Self::key_to_params(key)?;
        Ok(format!("http://example.com/volumes/{}", params["id"]))
    }

    fn url_to_key(url: &str, _resolver: &dyn Resolver) -> Result<i64, HrefError> {
        let id = url
            .strip_prefix("http://example.com/volumes/")
            .ok_or_else(|| ResolveError::NoMatch {
                url: url.to_string(),
            })?;
        Self::params_to_key(&Params::from([("id".to_string(), id.to_string())]))
    }
}

/// One-to-one with a volume: keyed by a hyperlink to it.
struct Cover {
    volume: Href<Volume>,
}

impl Referrable for Cover {
    type Key = Href<Volume>;

    fn schema() -> ModelSchema {
        ModelSchema::new("Cover")
            .details_view("get_cover")
            .key_field("volume", FieldType::href::<Volume>(), PrimaryKey::new())
    }

    fn get_key(&self) -> Href<Volume> {
        self.volume.clone()
    }

    fn key_to_url(key: &Href<Volume>, _resolver: &dyn Resolver) -> Result<String, HrefError> {
        let params = Self::key_to_params(key)?;
        Ok(format!("http://example.com/volumes/{}/cover", params["volume_id"]))
    }

    fn url_to_key(url: &str, _resolver: &dyn Resolver) -> Result<Href<Volume>, HrefError> {
        let id = url
            .strip_prefix("http://example.com/volumes/")
            .and_then(|rest| rest.strip_suffix("/cover"))
            .ok_or_else(|| ResolveError::NoMatch {
                url: url.to_string(),
            })?;
        Self::params_to_key(&Params::from([("volume_id".to_string(), id.to_string())]))
    }
}

#[test]
fn models_register_cleanly() {
    register::<Volume>().expect("volume is well formed");
    register::<Cover>().expect("cover is well formed");
}

#[test]
fn self_keyed_model_uses_its_own_layout() {
    let href = Href::<Volume>::from_key(3);
    assert_eq!(
        href.url_with(&Unused),
        Ok("http://example.com/volumes/3")
    );

    let parsed = Href::<Volume>::from_url_with("http://example.com/volumes/3", &Unused)
        .expect("override should parse");
    assert_eq!(parsed, href);

    let volume = Volume {
        this: Href::from_key(3),
    };
    assert_eq!(volume.get_key(), 3);
}

#[test]
fn hyperlink_key_from_referred_model_key_and_url() {
    let resolver: Arc<dyn Resolver> = Arc::new(Unused);

    let from_key = coerce_with::<Cover>(HrefInput::Raw(json!(8)), resolver.clone())
        .expect("raw volume key");
    assert_eq!(from_key.key(), &Href::from_key(8));
    assert_eq!(
        from_key.url_with(&*resolver),
        Ok("http://example.com/volumes/8/cover")
    );

    let from_volume_url = coerce_with::<Cover>(
        HrefInput::Raw(json!("http://example.com/volumes/8")),
        resolver.clone(),
    )
    .expect("volume url is a valid key");
    assert_eq!(from_volume_url, from_key);

    let from_cover_url = coerce_with::<Cover>(
        HrefInput::Raw(json!("http://example.com/volumes/8/cover")),
        resolver.clone(),
    )
    .expect("cover url");
    assert_eq!(from_cover_url, from_key);

    let cover = Cover {
        volume: Href::from_key(8),
    };
    let from_model = coerce_with(HrefInput::Model(cover), resolver).expect("model");
    assert_eq!(from_model, from_key);
}

#[test]
fn descriptor_exposes_prefixed_params() {
    let descriptor = Cover::descriptor().expect("cover descriptor");
    assert_eq!(descriptor.params().collect::<Vec<_>>(), vec!["volume_id"]);
    assert_eq!(descriptor.depth(), 1);
    assert_eq!(descriptor.fields()[0].target(), Some("Volume"));
}
