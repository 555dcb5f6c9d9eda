/// Shared test fixtures: an in-memory document store and token helpers.
use std::collections::HashMap;
use std::cmp::Ordering;
use std::sync::{Arc, Mutex};

use actix_web::web;
use async_trait::async_trait;
use bearer_auth::TokenVerifier;
use bson::{Bson, Document};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use uuid::Uuid;

use ugc_service::db::{DocumentStore, RelatedJoin, StoreError};
use ugc_service::handlers::AppState;

/// In-memory [`DocumentStore`] with just enough filter/sort/join behavior
/// for the API flows under test.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Vec<Document>>>,
}

fn matches(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, value)| doc.get(key) == Some(value))
}

fn numeric(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(v) => Some(f64::from(*v)),
        Bson::Int64(v) => Some(*v as f64),
        Bson::Double(v) => Some(*v),
        _ => None,
    }
}

fn compare(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    match (a, b) {
        (Some(Bson::String(x)), Some(Bson::String(y))) => x.cmp(y),
        (Some(x), Some(y)) => match (numeric(x), numeric(y)) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn apply_sort(docs: &mut [Document], sort: &Document) {
    let Some((field, order)) = sort.iter().next() else {
        return;
    };
    let descending = numeric(order).unwrap_or(1.0) < 0.0;
    docs.sort_by(|a, b| {
        let ordering = compare(a.get(field), b.get(field));
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

fn paginate(docs: Vec<Document>, limit: i64, skip: u64) -> Vec<Document> {
    docs.into_iter()
        .skip(skip as usize)
        .take(limit as usize)
        .collect()
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.lock().unwrap();
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| matches(doc, &filter)).cloned()))
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: Document,
        sort: Document,
        limit: i64,
        skip: u64,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.lock().unwrap();
        let mut docs: Vec<Document> = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| matches(doc, &filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        apply_sort(&mut docs, &sort);
        Ok(paginate(docs, limit, skip))
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<(), StoreError> {
        let mut collections = self.collections.lock().unwrap();
        collections
            .entry(collection.to_string())
            .or_default()
            .push(document);
        Ok(())
    }

    async fn delete_many(&self, collection: &str, filter: Document) -> Result<u64, StoreError> {
        let mut collections = self.collections.lock().unwrap();
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };
        let before = docs.len();
        docs.retain(|doc| !matches(doc, &filter));
        Ok((before - docs.len()) as u64)
    }

    async fn aggregate_related(
        &self,
        collection: &str,
        filter: Document,
        join: RelatedJoin<'_>,
        sort: Document,
        limit: i64,
        skip: u64,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.lock().unwrap();
        let related: Vec<Document> = collections
            .get(join.related_collection)
            .cloned()
            .unwrap_or_default();

        let mut docs: Vec<Document> = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| matches(doc, &filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        for doc in &mut docs {
            let local_value = doc.get(join.local_field).cloned();
            let scores: Vec<f64> = related
                .iter()
                .filter(|rel| rel.get(join.foreign_field) == local_value.as_ref())
                .filter_map(|rel| rel.get(join.value_field).and_then(numeric))
                .collect();

            let sum: f64 = scores.iter().sum();
            doc.insert("sum", Bson::Int64(sum as i64));
            let avg = if scores.is_empty() {
                Bson::Null
            } else {
                Bson::Double(sum / scores.len() as f64)
            };
            doc.insert("avg", avg);
        }

        apply_sort(&mut docs, &sort);
        Ok(paginate(docs, limit, skip))
    }
}

pub fn state() -> web::Data<AppState> {
    web::Data::new(AppState::new(Arc::new(MemoryStore::default())))
}

pub fn verifier() -> Arc<TokenVerifier> {
    Arc::new(TokenVerifier::local_only())
}

fn sign(claims: &serde_json::Value) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(b"secret"),
    )
    .unwrap()
}

pub fn token_for(user_id: Uuid) -> String {
    sign(&json!({
        "sub": user_id,
        "exp": Utc::now().timestamp() + 1000,
        "jti": Uuid::new_v4(),
    }))
}

pub fn expired_token(user_id: Uuid) -> String {
    sign(&json!({
        "sub": user_id,
        "exp": Utc::now().timestamp() - 1000,
    }))
}
