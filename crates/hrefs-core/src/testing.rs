//! Fixture models and a minimal resolver for unit tests.

#![allow(dead_code)]

use crate::error::ResolveError;
use crate::href::Href;
use crate::referrable::Referrable;
use crate::resolver::{Params, Resolver, RouteMatch};
use crate::schema::{FieldType, ModelSchema, PrimaryKey};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Resolver over `{param}` path templates; unbound params go to the query.
pub(crate) struct TestResolver {
    routes: Vec<(String, String)>,
    builds: AtomicUsize,
    matches: AtomicUsize,
}

impl TestResolver {
    pub(crate) fn new(routes: &[(&str, &str)]) -> Self {
        Self {
            routes: routes
                .iter()
                .map(|(view, template)| (view.to_string(), template.to_string()))
                .collect(),
            builds: AtomicUsize::new(0),
            matches: AtomicUsize::new(0),
        }
    }

    pub(crate) fn library() -> Self {
        Self::new(&[
            ("get_book", "/books/{id}"),
            ("get_page", "/books/{book_id}/pages/{page_number}"),
            ("get_author", "/authors/{id}"),
            ("get_chapter", "/authors/{author_id}/chapters/{number}"),
            ("get_bookmark", "/bookmarks/{chapter_author_id}/{chapter_number}"),
            ("get_pet", "/pets/{id}"),
            ("get_slug", "/slugs/{slug}"),
        ])
    }

    pub(crate) fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    pub(crate) fn matches(&self) -> usize {
        self.matches.load(Ordering::SeqCst)
    }
}

fn placeholder(segment: &str) -> Option<&str> {
    segment.strip_prefix('{')?.strip_suffix('}')
}

impl Resolver for TestResolver {
    fn build_url(&self, view_name: &str, params: &Params) -> Result<String, ResolveError> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        let (_, template) = self
            .routes
            .iter()
            .find(|(view, _)| view == view_name)
            .ok_or_else(|| ResolveError::UnknownView(view_name.to_string()))?;

        let mut rest = params.clone();
        let mut segments = Vec::new();
        for segment in template.split('/') {
            match placeholder(segment) {
                Some(name) => segments.push(rest.remove(name).ok_or_else(|| {
                    ResolveError::MissingParam {
                        param: name.to_string(),
                    }
                })?),
                None => segments.push(segment.to_string()),
            }
        }
        let mut url = segments.join("/");
        if !rest.is_empty() {
            let query: Vec<String> = rest.iter().map(|(k, v)| format!("{k}={v}")).collect();
            url = format!("{url}?{}", query.join("&"));
        }
        Ok(url)
    }

    fn match_url(&self, url: &str) -> Result<RouteMatch, ResolveError> {
        self.matches.fetch_add(1, Ordering::SeqCst);
        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        let segments: Vec<&str> = path.split('/').collect();
        for (view, template) in &self.routes {
            let pattern: Vec<&str> = template.split('/').collect();
            if pattern.len() != segments.len() {
                continue;
            }
            let mut params = Params::new();
            let matched = pattern.iter().zip(&segments).all(|(pattern, segment)| {
                match placeholder(pattern) {
                    Some(name) if !segment.is_empty() => {
                        params.insert(name.to_string(), segment.to_string());
                        true
                    }
                    Some(_) => false,
                    None => pattern == segment,
                }
            });
            if matched {
                for pair in query.split('&').filter(|pair| !pair.is_empty()) {
                    let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
                    params.entry(k.to_string()).or_insert_with(|| v.to_string());
                }
                return Ok(RouteMatch::new(view.clone(), params));
            }
        }
        Err(ResolveError::NoMatch {
            url: url.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Book {
    pub id: i64,
    pub title: String,
}

impl Book {
    pub(crate) fn new(id: i64, title: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
        }
    }
}

impl Referrable for Book {
    type Key = i64;

    fn schema() -> ModelSchema {
        ModelSchema::new("Book")
            .details_view("get_book")
            .field("id", FieldType::of::<i64>())
            .field("title", FieldType::of::<String>())
    }

    fn get_key(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Page {
    pub book_id: i64,
    pub page_number: i64,
}

impl Referrable for Page {
    type Key = (i64, i64);

    fn schema() -> ModelSchema {
        ModelSchema::new("Page")
            .details_view("get_page")
            .key_field("book_id", FieldType::of::<i64>(), PrimaryKey::new())
            .key_field("page_number", FieldType::of::<i64>(), PrimaryKey::new())
    }

    fn get_key(&self) -> (i64, i64) {
        (self.book_id, self.page_number)
    }
}

/// Keyed by a hyperlink to itself, unwrapped to an `id` param.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Author {
    #[serde(rename = "self")]
    pub self_: Href<Author>,
    pub name: String,
}

impl Author {
    pub(crate) fn new(id: i64, name: &str) -> Self {
        Self {
            self_: Href::from_key(id),
            name: name.to_string(),
        }
    }
}

impl Referrable for Author {
    type Key = i64;

    fn schema() -> ModelSchema {
        ModelSchema::new("Author")
            .details_view("get_author")
            .key_field(
                "self",
                FieldType::href::<Author>(),
                PrimaryKey::new().name("id").key_type(FieldType::of::<i64>()),
            )
            .field("name", FieldType::of::<String>())
    }

    fn get_key(&self) -> i64 {
        *self.self_.key()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Chapter {
    pub author: Href<Author>,
    pub number: u32,
}

impl Referrable for Chapter {
    type Key = (Href<Author>, u32);

    fn schema() -> ModelSchema {
        ModelSchema::new("Chapter")
            .details_view("get_chapter")
            .key_field("author", FieldType::href::<Author>(), PrimaryKey::new())
            .key_field("number", FieldType::of::<u32>(), PrimaryKey::new())
    }

    fn get_key(&self) -> Self::Key {
        (self.author.clone(), self.number)
    }
}

/// Two levels of hyperlink nesting: Bookmark → Chapter → Author.
#[derive(Debug, Clone)]
pub(crate) struct Bookmark {
    pub chapter: Href<Chapter>,
}

impl Referrable for Bookmark {
    type Key = Href<Chapter>;

    fn schema() -> ModelSchema {
        ModelSchema::new("Bookmark")
            .details_view("get_bookmark")
            .key_field("chapter", FieldType::href::<Chapter>(), PrimaryKey::new())
    }

    fn get_key(&self) -> Self::Key {
        self.chapter.clone()
    }
}

/// One level too deep.
pub(crate) struct DeepChain {
    pub bookmark: Href<Bookmark>,
}

impl Referrable for DeepChain {
    type Key = Href<Bookmark>;

    fn schema() -> ModelSchema {
        ModelSchema::new("DeepChain")
            .details_view("get_deep_chain")
            .key_field("bookmark", FieldType::href::<Bookmark>(), PrimaryKey::new())
    }

    fn get_key(&self) -> Self::Key {
        self.bookmark.clone()
    }
}

// The Rust key types are placeholders: the schemas are rejected before the
// key types are compared.
pub(crate) struct MutualA;

impl Referrable for MutualA {
    type Key = i64;

    fn schema() -> ModelSchema {
        ModelSchema::new("MutualA")
            .details_view("get_a")
            .key_field("b", FieldType::href::<MutualB>(), PrimaryKey::new())
    }

    fn get_key(&self) -> i64 {
        0
    }
}

pub(crate) struct MutualB;

impl Referrable for MutualB {
    type Key = i64;

    fn schema() -> ModelSchema {
        ModelSchema::new("MutualB")
            .details_view("get_b")
            .key_field("a", FieldType::href::<MutualA>(), PrimaryKey::new())
    }

    fn get_key(&self) -> i64 {
        0
    }
}

pub(crate) struct Pet {
    pub id: i64,
}

impl Referrable for Pet {
    type Key = i64;

    fn schema() -> ModelSchema {
        ModelSchema::new("Pet")
            .details_view("get_pet")
            .field("id", FieldType::of::<i64>())
    }

    fn get_key(&self) -> i64 {
        self.id
    }
}

pub(crate) struct Cat {
    pub id: i64,
    pub lives: u8,
}

impl Referrable for Cat {
    type Key = i64;

    fn schema() -> ModelSchema {
        ModelSchema::new("Cat")
            .extends::<Pet>()
            .field("id", FieldType::of::<i64>())
            .field("lives", FieldType::of::<u8>())
    }

    fn get_key(&self) -> i64 {
        self.id
    }
}

/// Redeclares a key on top of the one inherited from [`Pet`].
pub(crate) struct Dog {
    pub tag: String,
}

impl Referrable for Dog {
    type Key = String;

    fn schema() -> ModelSchema {
        ModelSchema::new("Dog")
            .extends::<Pet>()
            .key_field("tag", FieldType::of::<String>(), PrimaryKey::new())
    }

    fn get_key(&self) -> String {
        self.tag.clone()
    }
}

pub(crate) struct Slug {
    pub slug: String,
}

impl Referrable for Slug {
    type Key = String;

    fn schema() -> ModelSchema {
        ModelSchema::new("Slug")
            .details_view("get_slug")
            .key_field("slug", FieldType::of::<String>(), PrimaryKey::new())
    }

    fn get_key(&self) -> String {
        self.slug.clone()
    }
}

pub(crate) struct NoView {
    pub id: i64,
}

impl Referrable for NoView {
    type Key = i64;

    fn schema() -> ModelSchema {
        ModelSchema::new("NoView").field("id", FieldType::of::<i64>())
    }

    fn get_key(&self) -> i64 {
        self.id
    }
}
