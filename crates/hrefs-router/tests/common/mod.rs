#![allow(dead_code)]

use hrefs_core::{FieldType, Href, ModelSchema, PrimaryKey, Referrable, Resolver};
use hrefs_router::{Router, RouterResolver};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// A plain model keyed by `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quest {
    pub id: Uuid,
}

impl Referrable for Quest {
    type Key = Uuid;

    fn schema() -> ModelSchema {
        ModelSchema::new("Quest")
            .details_view("get_quest")
            .field("id", FieldType::of::<Uuid>())
    }

    fn get_key(&self) -> Uuid {
        self.id
    }
}

/// A model whose key is a hyperlink to itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hero {
    #[serde(rename = "self")]
    pub self_: Href<Hero>,
    pub name: String,
}

impl Referrable for Hero {
    type Key = Uuid;

    fn schema() -> ModelSchema {
        ModelSchema::new("Hero")
            .details_view("get_hero")
            .key_field(
                "self",
                FieldType::href::<Hero>(),
                PrimaryKey::new().name("id").key_type(FieldType::of::<Uuid>()),
            )
            .field("name", FieldType::of::<String>())
    }

    fn get_key(&self) -> Uuid {
        *self.self_.key()
    }
}

/// Key made of two path parameters, one of them a nested hyperlink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub hero: Href<Hero>,
    pub entry: i64,
}

impl Referrable for JournalEntry {
    type Key = (Href<Hero>, i64);

    fn schema() -> ModelSchema {
        ModelSchema::new("JournalEntry")
            .details_view("heroes:get_journal")
            .key_field("hero", FieldType::href::<Hero>(), PrimaryKey::new())
            .key_field("entry", FieldType::of::<i64>(), PrimaryKey::new())
    }

    fn get_key(&self) -> Self::Key {
        (self.hero.clone(), self.entry)
    }
}

/// Key made of a path parameter and a query parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Familiar {
    pub hero: Href<Hero>,
    pub name: String,
}

impl Referrable for Familiar {
    type Key = (Href<Hero>, String);

    fn schema() -> ModelSchema {
        ModelSchema::new("Familiar")
            .details_view("heroes:get_familiar")
            .key_field("hero", FieldType::href::<Hero>(), PrimaryKey::new())
            .key_field("name", FieldType::of::<String>(), PrimaryKey::new())
    }

    fn get_key(&self) -> Self::Key {
        (self.hero.clone(), self.name.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
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

    fn get_key(&self) -> Self::Key {
        (self.book_id, self.page_number)
    }
}

/// Not referrable itself; only holds hyperlinks.
#[derive(Debug, Serialize, Deserialize)]
pub struct Library {
    pub books: Vec<Href<Book>>,
    #[serde(default)]
    pub featured: Option<Href<Page>>,
}

pub fn heroes_router() -> Router {
    let hero_routes = Router::new()
        .route("get_journal", "/journal/{entry}")
        .and_then(|r| r.route("get_familiar", "/familiar"))
        .expect("hero routes should register");
    Router::new()
        .route("get_quest", "/quests/{id}")
        .and_then(|r| r.route("get_hero", "/heroes/{id}"))
        .and_then(|r| r.mount("/heroes/{hero_id}", "heroes", hero_routes))
        .expect("hero router should build")
}

pub fn heroes_resolver() -> Arc<dyn Resolver> {
    Arc::new(
        RouterResolver::new(heroes_router())
            .with_base_url("http://example.com")
            .expect("base url should parse"),
    )
}

pub fn library_router() -> Router {
    Router::new()
        .route("get_book", "/books/{id}")
        .and_then(|r| r.route("get_page", "/books/{book_id}/pages/{page_number}"))
        .expect("library router should build")
}

pub fn library_resolver() -> Arc<dyn Resolver> {
    Arc::new(RouterResolver::new(library_router()))
}
