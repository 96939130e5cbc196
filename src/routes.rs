// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::AppState,
    docs::ApiDoc,
    handlers,
    middleware::{auth::auth_guard, tenancy::tenant_guard},
};

pub fn build_router(app_state: AppState) -> Router {
    // Rotas públicas de autenticação
    let auth_routes = Router::new()
        .route("/register-church", post(handlers::auth::register_church))
        .route("/login", post(handlers::auth::login));

    // Só exigem token (o usuário pode ainda não ter igreja)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let church_routes = Router::new()
        .route("/"
               ,get(handlers::church::get_church)
               .put(handlers::church::update_church)
        )
        .route("/plan", get(handlers::church::get_plan))
        .route("/stats"
               ,get(handlers::church::list_stats)
               .post(handlers::church::calculate_stats)
        )
        .route("/onboarding"
               ,get(handlers::church::get_onboarding)
               .put(handlers::church::update_onboarding)
        );

    let member_routes = Router::new()
        .route("/"
               ,get(handlers::members::list_members)
               .post(handlers::members::create_member)
        )
        .route("/{id}"
               ,get(handlers::members::get_member)
               .put(handlers::members::update_member)
               .delete(handlers::members::delete_member)
        )
        .route("/{id}/roles", post(handlers::members::grant_role));

    let ministry_routes = Router::new()
        .route("/"
               ,get(handlers::ministries::list_ministries)
               .post(handlers::ministries::create_ministry)
        )
        .route("/{id}"
               ,put(handlers::ministries::update_ministry)
               .delete(handlers::ministries::delete_ministry)
        )
        .route("/{id}/members"
               ,get(handlers::ministries::list_ministry_members)
               .post(handlers::ministries::add_ministry_member)
        )
        .route("/{id}/members/{member_id}"
               ,put(handlers::ministries::update_ministry_member)
               .delete(handlers::ministries::remove_ministry_member)
        )
        .route("/{id}/roles"
               ,get(handlers::ministries::list_ministry_roles)
               .post(handlers::ministries::create_ministry_role)
        )
        .route("/{id}/roles/{role_id}"
               ,put(handlers::ministries::update_ministry_role)
               .delete(handlers::ministries::delete_ministry_role)
        );

    let song_routes = Router::new()
        .route("/"
               ,get(handlers::worship::list_songs)
               .post(handlers::worship::create_song)
        )
        .route("/{id}"
               ,get(handlers::worship::get_song)
               .put(handlers::worship::update_song)
               .delete(handlers::worship::delete_song)
        );

    let worship_set_routes = Router::new()
        .route("/"
               ,get(handlers::worship::list_worship_sets)
               .post(handlers::worship::create_worship_set)
        )
        .route("/{id}"
               ,put(handlers::worship::update_worship_set)
               .delete(handlers::worship::delete_worship_set)
        );

    let event_routes = Router::new()
        .route("/"
               ,get(handlers::events::list_events)
               .post(handlers::events::create_event)
        )
        .route("/{id}"
               ,put(handlers::events::update_event)
               .delete(handlers::events::delete_event)
        )
        .route("/{id}/schedules", get(handlers::schedules::list_event_schedules))
        .route("/{id}/attendance"
               ,get(handlers::attendance::list_attendance)
               .post(handlers::attendance::record_attendance)
        );

    let schedule_routes = Router::new()
        .route("/", post(handlers::schedules::create_schedule))
        .route("/conflicts", get(handlers::schedules::check_conflicts))
        .route("/mine", get(handlers::schedules::list_my_schedules))
        .route("/{id}"
               ,put(handlers::schedules::update_schedule)
               .delete(handlers::schedules::delete_schedule)
        )
        .route("/{id}/confirm", post(handlers::schedules::confirm_schedule));

    let attendance_routes = Router::new()
        .route("/{id}", delete(handlers::attendance::delete_attendance));

    let announcement_routes = Router::new()
        .route("/"
               ,get(handlers::announcements::list_announcements)
               .post(handlers::announcements::create_announcement)
        )
        .route("/{id}"
               ,put(handlers::announcements::update_announcement)
               .delete(handlers::announcements::delete_announcement)
        )
        .route("/{id}/views", post(handlers::announcements::record_view));

    let finance_routes = Router::new()
        .route("/accounts"
               ,get(handlers::finance::list_accounts)
               .post(handlers::finance::create_account)
        )
        .route("/accounts/{id}"
               ,put(handlers::finance::update_account)
               .delete(handlers::finance::delete_account)
        )
        .route("/categories"
               ,get(handlers::finance::list_categories)
               .post(handlers::finance::create_category)
        )
        .route("/categories/{id}"
               ,put(handlers::finance::update_category)
               .delete(handlers::finance::delete_category)
        )
        .route("/contacts"
               ,get(handlers::finance::list_contacts)
               .post(handlers::finance::create_contact)
        )
        .route("/contacts/{id}"
               ,put(handlers::finance::update_contact)
               .delete(handlers::finance::delete_contact)
        )
        .route("/cost-centers"
               ,get(handlers::finance::list_cost_centers)
               .post(handlers::finance::create_cost_center)
        )
        .route("/cost-centers/{id}"
               ,put(handlers::finance::update_cost_center)
               .delete(handlers::finance::delete_cost_center)
        )
        .route("/transactions"
               ,get(handlers::finance::list_transactions)
               .post(handlers::finance::create_transaction)
        )
        .route("/transactions/{id}"
               ,put(handlers::finance::update_transaction)
               .delete(handlers::finance::delete_transaction)
        );

    // Tudo que opera dentro de uma igreja passa pelo tenant_guard
    let tenant_routes = Router::new()
        .nest("/church", church_routes)
        .nest("/members", member_routes)
        .nest("/ministries", ministry_routes)
        .nest("/songs", song_routes)
        .nest("/worship-sets", worship_set_routes)
        .nest("/events", event_routes)
        .nest("/schedules", schedule_routes)
        .nest("/attendance", attendance_routes)
        .nest("/announcements", announcement_routes)
        .nest("/finance", finance_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            tenant_guard,
        ));

    // O frontend roda em outra origem
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api", tenant_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::{
        common::i18n::I18nStore,
        config::Config,
        db::{memory::MemoryStore, ChurchStore, ScheduleStore},
        models::{
            church::RegisterChurchPayload,
            event::NewSchedule,
            member::{AppRole, NewProfile},
        },
    };

    fn test_state(store: Arc<MemoryStore>) -> AppState {
        let config = Config {
            database_url: "postgres://localhost/igreja_test".into(),
            jwt_secret: "segredo-de-teste".into(),
            bind_addr: "127.0.0.1:0".into(),
            database_max_connections: 1,
            bcrypt_cost: 4,
            jwt_ttl_days: 1,
        };
        // Nunca conecta: as rotas testadas aqui só passam pelos stores em memória
        let pool = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();

        AppState::from_parts(
            pool,
            config,
            Arc::new(I18nStore::load().unwrap()),
            store.clone(),
            store.clone(),
            store,
        )
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn authed(mut request: Request<Body>, token: &str, church_id: Uuid) -> Request<Body> {
        let headers = request.headers_mut();
        headers.insert(
            header::AUTHORIZATION,
            format!("Bearer {}", token).parse().unwrap(),
        );
        headers.insert("x-church-id", church_id.to_string().parse().unwrap());
        request
    }

    // Igreja nova e o token do pastor que a cadastrou
    async fn registered_church(state: &AppState, email: &str, name: &str) -> (Uuid, String) {
        let registered = state
            .registration_service
            .register_church(RegisterChurchPayload {
                email: email.into(),
                password: "segredo1".into(),
                full_name: "Ana".into(),
                church_name: name.into(),
                address: None,
                phone: None,
                plan_type: "freemium".into(),
                cnpj: None,
                church_type: None,
                church_size: None,
            })
            .await
            .unwrap();
        let token = state.auth_service.create_token(registered.user_id).unwrap();
        (registered.church_id, token)
    }

    async fn add_person(
        state: &AppState,
        store: &MemoryStore,
        church_id: Uuid,
        email: &str,
        name: &str,
        role: AppRole,
    ) -> (Uuid, String) {
        let user = state
            .auth_service
            .issue_principal(email, "segredo1")
            .await
            .unwrap();
        store
            .create_profile(NewProfile {
                id: user.id,
                church_id,
                name: name.into(),
                phone: None,
                photo_url: None,
            })
            .await
            .unwrap();
        store.grant_role(user.id, role).await.unwrap();

        let token = state.auth_service.create_token(user.id).unwrap();
        (user.id, token)
    }

    // Igreja registrada + um MEMBER comum, com o token dele
    async fn church_with_member(state: &AppState, store: &MemoryStore) -> (Uuid, String) {
        let (church_id, _) = registered_church(state, "pastor@graca.com", "Graça Viva").await;
        let (_, token) =
            add_person(state, store, church_id, "membro@graca.com", "Beto", AppRole::Member).await;
        (church_id, token)
    }

    fn new_member_body(church_id: Uuid, email: &str, role: &str) -> Value {
        json!({
            "email": email,
            "password": "segredo1",
            "name": "Carla Dias",
            "phone": "11988887777",
            "church_id": church_id,
            "role": role,
            "photo_url": "https://fotos.exemplo/carla.png"
        })
    }

    #[tokio::test]
    async fn health_answers_ok() {
        let app = build_router(test_state(Arc::new(MemoryStore::new())));

        let response = app
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn register_church_rejects_invalid_payload_with_envelope() {
        let app = build_router(test_state(Arc::new(MemoryStore::new())));

        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/auth/register-church",
                json!({
                    "email": "nao-e-email",
                    "password": "123",
                    "fullName": "",
                    "churchName": "Graça Viva"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(false));
        assert!(body["details"]["email"].is_array());
    }

    #[tokio::test]
    async fn register_church_returns_the_new_ids() {
        let store = Arc::new(MemoryStore::new());
        let app = build_router(test_state(store.clone()));

        let response = app
            .oneshot(json_request(
                Method::POST,
                "/api/auth/register-church",
                json!({
                    "email": "p@x.com",
                    "password": "secret1",
                    "fullName": "Ana",
                    "churchName": "Graça Viva",
                    "planType": "premium"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(true));

        let church_id: Uuid = serde_json::from_value(body["church_id"].clone()).unwrap();
        assert!(store.snapshot().churches.iter().any(|c| c.id == church_id));
    }

    #[tokio::test]
    async fn duplicate_registration_is_reported_as_server_error() {
        let store = Arc::new(MemoryStore::new());
        let state = test_state(store.clone());
        let registration = json!({
            "email": "p@x.com",
            "password": "secret1",
            "fullName": "Ana",
            "churchName": "Graça Viva"
        });

        let first = build_router(state.clone())
            .oneshot(json_request(Method::POST, "/api/auth/register-church", registration.clone()))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = build_router(state)
            .oneshot(json_request(Method::POST, "/api/auth/register-church", registration))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(second).await["success"], json!(false));
        assert_eq!(store.snapshot().churches.len(), 1);
    }

    #[tokio::test]
    async fn tenant_routes_require_a_token() {
        let app = build_router(test_state(Arc::new(MemoryStore::new())));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/church")
                    .header("x-church-id", Uuid::new_v4().to_string())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn tenant_routes_require_the_church_header() {
        let store = Arc::new(MemoryStore::new());
        let state = test_state(store.clone());
        let (_, token) = church_with_member(&state, &store).await;

        let response = build_router(state)
            .oneshot(
                Request::builder()
                    .uri("/api/church")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn other_church_is_forbidden() {
        let store = Arc::new(MemoryStore::new());
        let state = test_state(store.clone());
        let (_, token) = church_with_member(&state, &store).await;

        let response = build_router(state)
            .oneshot(
                Request::builder()
                    .uri("/api/church")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .header("x-church-id", Uuid::new_v4().to_string())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn member_cannot_update_the_church() {
        let store = Arc::new(MemoryStore::new());
        let state = test_state(store.clone());
        let (church_id, token) = church_with_member(&state, &store).await;

        let request = authed(
            json_request(Method::PUT, "/api/church", json!({ "name": "Outra" })),
            &token,
            church_id,
        );

        let response = build_router(state).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await["success"], json!(false));
    }

    #[tokio::test]
    async fn me_requires_a_valid_token() {
        let app = build_router(test_state(Arc::new(MemoryStore::new())));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/users/me")
                    .header(header::AUTHORIZATION, "Bearer lixo")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn me_returns_profile_and_roles() {
        let store = Arc::new(MemoryStore::new());
        let state = test_state(store.clone());
        let (church_id, token) = church_with_member(&state, &store).await;

        let response = build_router(state)
            .oneshot(
                Request::builder()
                    .uri("/api/users/me")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["roles"], json!(["MEMBER"]));
        assert_eq!(body["profile"]["churchId"], json!(church_id.to_string()));
    }

    #[tokio::test]
    async fn pastor_creates_a_member_from_the_snake_case_body() {
        let store = Arc::new(MemoryStore::new());
        let state = test_state(store.clone());
        let (church_id, pastor) = registered_church(&state, "pastor@graca.com", "Graça Viva").await;

        let request = authed(
            json_request(
                Method::POST,
                "/api/members",
                new_member_body(church_id, "carla@graca.com", "LEADER"),
            ),
            &pastor,
            church_id,
        );
        let response = build_router(state).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["user"]["email"], json!("carla@graca.com"));
        assert_eq!(body["user"]["name"], json!("Carla Dias"));
        assert_eq!(body["user"]["photoUrl"], json!("https://fotos.exemplo/carla.png"));
        assert_eq!(body["user"]["roles"], json!(["LEADER"]));

        let snapshot = store.snapshot();
        let user_id: Uuid = serde_json::from_value(body["user"]["id"].clone()).unwrap();
        assert!(snapshot
            .profiles
            .iter()
            .any(|p| p.id == user_id && p.church_id == Some(church_id)));
        assert!(snapshot.onboardings.iter().any(|o| o.church_id == church_id && o.first_leader_added));
    }

    #[tokio::test]
    async fn member_cannot_create_members() {
        let store = Arc::new(MemoryStore::new());
        let state = test_state(store.clone());
        let (church_id, token) = church_with_member(&state, &store).await;

        let request = authed(
            json_request(
                Method::POST,
                "/api/members",
                new_member_body(church_id, "carla@graca.com", "MEMBER"),
            ),
            &token,
            church_id,
        );
        let response = build_router(state).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await["success"], json!(false));
        assert!(!store.snapshot().users.iter().any(|u| u.email == "carla@graca.com"));
    }

    #[tokio::test]
    async fn second_pastor_is_a_conflict() {
        let store = Arc::new(MemoryStore::new());
        let state = test_state(store.clone());
        let (church_id, pastor) = registered_church(&state, "pastor@graca.com", "Graça Viva").await;

        let request = authed(
            json_request(
                Method::POST,
                "/api/members",
                new_member_body(church_id, "outro@graca.com", "PASTOR"),
            ),
            &pastor,
            church_id,
        );
        let response = build_router(state).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(false));
        assert!(body["error"].as_str().is_some_and(|m| !m.is_empty()));
        assert!(!store.snapshot().users.iter().any(|u| u.email == "outro@graca.com"));
    }

    #[tokio::test]
    async fn conflict_preview_does_not_reach_into_another_church() {
        let store = Arc::new(MemoryStore::new());
        let state = test_state(store.clone());
        let (church_a, pastor_a) = registered_church(&state, "pastor@graca.com", "Graça Viva").await;
        let (church_b, _) = registered_church(&state, "pastor@monte.com", "Monte Sião").await;

        let (singer, _) =
            add_person(&state, &store, church_b, "cantora@monte.com", "Joana", AppRole::Member).await;
        let t = Utc.with_ymd_and_hms(2025, 3, 2, 19, 0, 0).unwrap();
        let event = store.insert_event(church_b, "Culto de Domingo", t);
        store
            .create_schedule(NewSchedule {
                event_id: event.id,
                ministry_id: Uuid::new_v4(),
                user_id: singer,
                role: "Vocal".into(),
                notes: None,
            })
            .await
            .unwrap();

        let uri = format!(
            "/api/schedules/conflicts?userId={}&eventDate=2025-03-02T19:00:00Z",
            singer
        );
        let request = authed(
            Request::builder().uri(&uri).body(Body::empty()).unwrap(),
            &pastor_a,
            church_a,
        );
        let response = build_router(state).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(false));
        assert!(!body.to_string().contains("Culto de Domingo"));
    }

    #[tokio::test]
    async fn member_cannot_add_songs() {
        let store = Arc::new(MemoryStore::new());
        let state = test_state(store.clone());
        let (church_id, token) = church_with_member(&state, &store).await;

        let request = authed(
            json_request(Method::POST, "/api/songs", json!({ "title": "Grande é o Senhor" })),
            &token,
            church_id,
        );
        let response = build_router(state).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn song_without_title_is_rejected() {
        let store = Arc::new(MemoryStore::new());
        let state = test_state(store.clone());
        let (church_id, pastor) = registered_church(&state, "pastor@graca.com", "Graça Viva").await;

        let request = authed(
            json_request(Method::POST, "/api/songs", json!({ "title": "", "bpm": 0 })),
            &pastor,
            church_id,
        );
        let response = build_router(state).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["details"]["title"].is_array());
        assert!(body["details"]["bpm"].is_array());
    }

    #[tokio::test]
    async fn ministry_team_changes_need_pastor_or_leader() {
        let store = Arc::new(MemoryStore::new());
        let state = test_state(store.clone());
        let (church_id, token) = church_with_member(&state, &store).await;
        let ministry_id = store.snapshot().ministries[0].id;

        let request = authed(
            json_request(
                Method::POST,
                &format!("/api/ministries/{}/roles", ministry_id),
                json!({ "roleName": "Baterista" }),
            ),
            &token,
            church_id,
        );
        let response = build_router(state).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn stats_are_for_pastor_or_leader() {
        let store = Arc::new(MemoryStore::new());
        let state = test_state(store.clone());
        let (church_id, token) = church_with_member(&state, &store).await;

        let request = authed(
            Request::builder().uri("/api/church/stats").body(Body::empty()).unwrap(),
            &token,
            church_id,
        );
        let response = build_router(state).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn inverted_stats_range_is_rejected() {
        let store = Arc::new(MemoryStore::new());
        let state = test_state(store.clone());
        let (church_id, pastor) = registered_church(&state, "pastor@graca.com", "Graça Viva").await;

        let request = authed(
            Request::builder()
                .uri("/api/church/stats?startDate=2025-03-10&endDate=2025-03-01")
                .body(Body::empty())
                .unwrap(),
            &pastor,
            church_id,
        );
        let response = build_router(state).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["success"], json!(false));
    }
}
