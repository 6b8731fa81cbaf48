use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{ItemCreate, ItemUpdate},
    store::{ItemChanges, NewItem},
    Item,
};
use crate::{
    auth::{services::ensure_owner_or_superuser, CurrentUser},
    error::AppError,
    pagination::Pagination,
    state::AppState,
    users::User,
};

pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route(
            "/items/:id",
            get(read_item).put(update_item).delete(delete_item),
        )
}

fn item_not_found() -> AppError {
    AppError::NotFound("Item not found".into())
}

/// Loads an item the caller may act on: 404 when absent, 403 when owned by
/// someone else and the caller is not a superuser.
async fn load_owned(state: &AppState, caller: &User, id: Uuid) -> Result<Item, AppError> {
    let item = state
        .items
        .find_by_id(id)
        .await?
        .ok_or_else(item_not_found)?;
    ensure_owner_or_superuser(caller, item.owner_id)?;
    Ok(item)
}

#[instrument(skip(state, caller))]
pub async fn list_items(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Item>>, AppError> {
    let (skip, limit) = page.bounds();
    let items = if caller.is_superuser {
        state.items.list_all(skip, limit).await?
    } else {
        state.items.list_by_owner(caller.id, skip, limit).await?
    };
    Ok(Json(items))
}

#[instrument(skip(state, caller, payload))]
pub async fn create_item(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Json(payload): Json<ItemCreate>,
) -> Result<Json<Item>, AppError> {
    let title = payload.title.trim();
    if title.is_empty() {
        return Err(AppError::BadRequest("Title must not be empty".into()));
    }
    let item = state
        .items
        .create(NewItem {
            owner_id: caller.id,
            title: title.to_string(),
            description: payload.description,
        })
        .await?;
    info!(item_id = %item.id, owner_id = %caller.id, "item created");
    Ok(Json(item))
}

#[instrument(skip(state, caller))]
pub async fn read_item(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Item>, AppError> {
    Ok(Json(load_owned(&state, &caller, id).await?))
}

#[instrument(skip(state, caller, payload))]
pub async fn update_item(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ItemUpdate>,
) -> Result<Json<Item>, AppError> {
    load_owned(&state, &caller, id).await?;
    let title = payload.title.map(|t| t.trim().to_string());
    if title.as_deref() == Some("") {
        return Err(AppError::BadRequest("Title must not be empty".into()));
    }
    let item = state
        .items
        .update(
            id,
            ItemChanges {
                title,
                description: payload.description,
            },
        )
        .await?
        .ok_or_else(item_not_found)?;
    info!(item_id = %item.id, by = %caller.id, "item updated");
    Ok(Json(item))
}

#[instrument(skip(state, caller))]
pub async fn delete_item(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Item>, AppError> {
    load_owned(&state, &caller, id).await?;
    let item = state
        .items
        .delete(id)
        .await?
        .ok_or_else(item_not_found)?;
    info!(item_id = %item.id, by = %caller.id, "item deleted");
    Ok(Json(item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::password::hash_password,
        items::{memory::MemoryItemStore, store::ItemStore},
        state::FakeStores,
        users::store::{NewUser, UserStore},
    };
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct Fixture {
        state: AppState,
        stores: FakeStores,
    }

    impl Fixture {
        fn new() -> Self {
            let (state, stores) = AppState::fake_with_stores();
            Self { state, stores }
        }

        fn items(&self) -> &Arc<MemoryItemStore> {
            &self.stores.items
        }

        async fn user(&self, email: &str, superuser: bool) -> (User, String) {
            let user = self
                .stores
                .users
                .create(NewUser {
                    email: email.into(),
                    hashed_password: hash_password("password").unwrap(),
                    full_name: None,
                    is_active: true,
                    is_superuser: superuser,
                })
                .await
                .unwrap();
            let token = self.state.tokens.issue(user.id).unwrap();
            (user, token)
        }

        async fn item(&self, owner: &User, title: &str) -> Item {
            self.items()
                .create(NewItem {
                    owner_id: owner.id,
                    title: title.into(),
                    description: Some(format!("about {title}")),
                })
                .await
                .unwrap()
        }

        async fn send(&self, method: &str, uri: &str, token: &str, body: Option<serde_json::Value>) -> Response {
            let req = Request::builder()
                .method(method)
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(header::CONTENT_TYPE, "application/json");
            let body = body.map_or_else(Body::empty, |b| Body::from(b.to_string()));
            item_routes()
                .with_state(self.state.clone())
                .oneshot(req.body(body).unwrap())
                .await
                .unwrap()
        }
    }

    async fn body_json(res: Response) -> serde_json::Value {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn titles(body: &serde_json::Value) -> Vec<String> {
        let mut t: Vec<String> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["title"].as_str().unwrap().to_string())
            .collect();
        t.sort();
        t
    }

    #[tokio::test]
    async fn item_routes_require_a_token() {
        let app = item_routes().with_state(AppState::fake());
        let id = Uuid::new_v4();
        for (method, uri) in [
            ("GET", "/items".to_string()),
            ("POST", "/items".to_string()),
            ("GET", format!("/items/{id}")),
            ("PUT", format!("/items/{id}")),
            ("DELETE", format!("/items/{id}")),
        ] {
            let res = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri(&uri)
                        .header(header::CONTENT_TYPE, "application/json")
                        .body(Body::from("{}"))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
        }
    }

    #[tokio::test]
    async fn token_for_unknown_user_is_rejected() {
        let fx = Fixture::new();
        let token = fx.state.tokens.issue(Uuid::new_v4()).unwrap();
        let res = fx.send("GET", "/items", &token, None).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(res).await["error"], "user_not_found");
    }

    #[tokio::test]
    async fn create_assigns_the_caller_as_owner() {
        let fx = Fixture::new();
        let (owner, token) = fx.user("owner@example.com", false).await;

        let res = fx
            .send("POST", "/items", &token, Some(serde_json::json!({"title": "  Groceries  "})))
            .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["title"], "Groceries");
        assert_eq!(body["owner_id"], owner.id.to_string());
        assert!(body["description"].is_null());

        let res = fx
            .send("POST", "/items", &token, Some(serde_json::json!({"title": "   "})))
            .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn listing_is_scoped_to_the_caller_unless_superuser() {
        let fx = Fixture::new();
        let (alice, alice_token) = fx.user("alice@example.com", false).await;
        let (bob, _) = fx.user("bob@example.com", false).await;
        let (_, admin_token) = fx.user("admin@example.com", true).await;
        fx.item(&alice, "a1").await;
        fx.item(&alice, "a2").await;
        fx.item(&bob, "b1").await;

        let res = fx.send("GET", "/items", &alice_token, None).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(titles(&body_json(res).await), ["a1", "a2"]);

        let res = fx.send("GET", "/items", &admin_token, None).await;
        assert_eq!(titles(&body_json(res).await), ["a1", "a2", "b1"]);

        let res = fx.send("GET", "/items?limit=1", &admin_token, None).await;
        assert_eq!(body_json(res).await.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn owner_can_read_update_and_delete() {
        let fx = Fixture::new();
        let (owner, token) = fx.user("owner@example.com", false).await;
        let item = fx.item(&owner, "mine").await;
        let uri = format!("/items/{}", item.id);

        let res = fx.send("GET", &uri, &token, None).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await["title"], "mine");

        let res = fx
            .send("PUT", &uri, &token, Some(serde_json::json!({"title": "renamed"})))
            .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["title"], "renamed");
        assert_eq!(body["description"], "about mine");

        let res = fx
            .send("PUT", &uri, &token, Some(serde_json::json!({"description": null})))
            .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(body_json(res).await["description"].is_null());

        let res = fx
            .send("PUT", &uri, &token, Some(serde_json::json!({"title": ""})))
            .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let res = fx.send("DELETE", &uri, &token, None).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(fx.items().find_by_id(item.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn foreign_items_are_forbidden() {
        let fx = Fixture::new();
        let (owner, _) = fx.user("owner@example.com", false).await;
        let (_, intruder_token) = fx.user("intruder@example.com", false).await;
        let item = fx.item(&owner, "private").await;
        let uri = format!("/items/{}", item.id);

        for (method, body) in [
            ("GET", None),
            ("PUT", Some(serde_json::json!({"title": "hijacked"}))),
            ("DELETE", None),
        ] {
            let res = fx.send(method, &uri, &intruder_token, body).await;
            assert_eq!(res.status(), StatusCode::FORBIDDEN, "{method}");
            assert_eq!(body_json(res).await["error"], "forbidden");
        }

        let stored = fx.items().find_by_id(item.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "private");
    }

    #[tokio::test]
    async fn superuser_can_act_on_any_item() {
        let fx = Fixture::new();
        let (owner, _) = fx.user("owner@example.com", false).await;
        let (_, admin_token) = fx.user("admin@example.com", true).await;
        let item = fx.item(&owner, "theirs").await;
        let uri = format!("/items/{}", item.id);

        let res = fx.send("GET", &uri, &admin_token, None).await;
        assert_eq!(res.status(), StatusCode::OK);

        let res = fx
            .send("PUT", &uri, &admin_token, Some(serde_json::json!({"title": "moderated"})))
            .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["title"], "moderated");
        assert_eq!(body["owner_id"], owner.id.to_string());

        let res = fx.send("DELETE", &uri, &admin_token, None).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_item_is_not_found() {
        let fx = Fixture::new();
        let (_, token) = fx.user("owner@example.com", false).await;
        let (_, admin_token) = fx.user("admin@example.com", true).await;
        let uri = format!("/items/{}", Uuid::new_v4());

        for (method, body) in [
            ("GET", None),
            ("PUT", Some(serde_json::json!({"title": "x"}))),
            ("DELETE", None),
        ] {
            for t in [&token, &admin_token] {
                let res = fx.send(method, &uri, t, body.clone()).await;
                assert_eq!(res.status(), StatusCode::NOT_FOUND, "{method}");
                let body = body_json(res).await;
                assert_eq!(body["error"], "not_found");
                assert_eq!(body["message"], "Item not found");
            }
        }
    }
}
