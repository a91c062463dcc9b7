//! End-to-end tests driving the router with in-process requests

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use classroom_api::{AppState, create_router};
use classroom_auth::TokenService;
use classroom_db::{Database, Role};
use classroom_notify::{Dispatcher, Notification, Notifier, NotifyError, RecipientPolicy};
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::sync::Mutex;
use tower::ServiceExt;

const SECRET: &str = "integration-test-secret";

#[derive(Default)]
struct Outbox {
    sent: Mutex<Vec<Notification>>,
}

#[async_trait]
impl Notifier for Outbox {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.sent.lock().await.push(notification.clone());
        Ok(())
    }
}

struct TestApp {
    router: Router,
    db: Database,
    outbox: Arc<Outbox>,
    _dir: TempDir,
}

/// Relay that refuses every message
struct Refusing;

#[async_trait]
impl Notifier for Refusing {
    async fn send(&self, _notification: &Notification) -> Result<(), NotifyError> {
        Err(NotifyError::Rejected {
            status: 503,
            message: "relay unavailable".to_string(),
        })
    }
}

/// Relay that never answers
struct Stalled;

#[async_trait]
impl Notifier for Stalled {
    async fn send(&self, _notification: &Notification) -> Result<(), NotifyError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(())
    }
}

impl TestApp {
    async fn new() -> Self {
        let outbox = Arc::new(Outbox::default());
        Self::with_notifier(outbox.clone(), outbox, Duration::from_secs(5)).await
    }

    /// Build an app delivering through `notifier`; `outbox` is only observed
    async fn with_notifier(
        notifier: Arc<dyn Notifier>,
        outbox: Arc<Outbox>,
        timeout: Duration,
    ) -> Self {
        let dir = TempDir::new().unwrap();
        let url = format!("sqlite:{}/classroom.db?mode=rwc", dir.path().display());
        let db = Database::new(&url).await.unwrap();

        let dispatcher = Dispatcher::new(notifier, RecipientPolicy::default(), timeout);
        let state = AppState::new(db.clone(), Arc::new(TokenService::new(SECRET)), dispatcher);

        Self {
            router: create_router(state, None),
            db,
            outbox,
            _dir: dir,
        }
    }

    async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.call_raw(request).await
    }

    /// Send a prebuilt request; bodies that are not JSON come back as `Null`
    async fn call_raw(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn signup(&self, email: &str) {
        let (status, _) = self
            .call(
                Method::POST,
                "/teacher/signup",
                None,
                Some(json!({
                    "firstName": "Grace",
                    "lastName": "Hopper",
                    "email": email,
                    "password": "Secret#123",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    async fn login(&self, email: &str, password: &str, role: &str) -> (StatusCode, Value) {
        self.call(
            Method::POST,
            "/teacher/login",
            None,
            Some(json!({ "email": email, "password": password, "role": role })),
        )
        .await
    }

    async fn teacher_token(&self, email: &str) -> String {
        self.signup(email).await;
        let (status, body) = self.login(email, "Secret#123", "teacher").await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    async fn add_student(&self, token: &str, email: &str) -> i64 {
        let (status, body) = self
            .call(
                Method::POST,
                "/students/add",
                Some(token),
                Some(json!({
                    "name": "Alan Turing",
                    "email": email,
                    "course": "Mathematics",
                    "dob": "2005-06-23",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["student"]["id"].as_i64().unwrap()
    }

    /// Wait for the detached notification task and pull the password out of it
    async fn generated_password(&self, email: &str) -> String {
        for _ in 0..100 {
            let sent = self.outbox.sent.lock().await;
            if let Some(n) = sent.iter().find(|n| n.to == email) {
                return n
                    .text
                    .lines()
                    .find_map(|l| l.strip_prefix("Your password: "))
                    .unwrap()
                    .to_string();
            }
            drop(sent);
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("no notification sent to {}", email);
    }

    async fn student_token(&self, email: &str) -> String {
        let password = self.generated_password(email).await;
        let (status, body) = self.login(email, &password, "student").await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["token"].as_str().unwrap().to_string()
    }

    async fn add_course(&self, token: &str, name: &str, code: i64, hours: i64) -> i64 {
        let (status, body) = self
            .call(
                Method::POST,
                "/courses/addCourse",
                Some(token),
                Some(json!({ "courseName": name, "courseCode": code, "creditHour": hours })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["course"]["id"].as_i64().unwrap()
    }
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let (status, body) = app.call(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_signup_and_login() {
    let app = TestApp::new().await;
    app.signup("t@gmail.com").await;

    let (status, body) = app.login("t@gmail.com", "Secret#123", "teacher").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Successful Login");
    assert_eq!(body["user"]["role"], "teacher");
    assert_eq!(body["expiresIn"], 3600);

    let claims = TokenService::new(SECRET)
        .verify(body["token"].as_str().unwrap())
        .unwrap();
    assert_eq!(claims.role, Role::Teacher);
    assert_eq!(claims.exp - claims.iat, 3600);
}

#[tokio::test]
async fn test_signup_duplicate_email() {
    let app = TestApp::new().await;
    app.signup("t@gmail.com").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/teacher/signup",
            None,
            Some(json!({
                "firstName": "Other",
                "lastName": "Person",
                "email": "t@gmail.com",
                "password": "Another#123",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email already exists");
}

#[tokio::test]
async fn test_signup_validation() {
    let app = TestApp::new().await;
    let (status, _) = app
        .call(
            Method::POST,
            "/teacher/signup",
            None,
            Some(json!({
                "firstName": "Al",
                "lastName": "Hopper",
                "email": "t@gmail.com",
                "password": "Secret#123",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new().await;
    app.signup("t@gmail.com").await;

    let (wrong_status, wrong_body) = app.login("t@gmail.com", "Wrong#1234", "teacher").await;
    let (unknown_status, unknown_body) = app.login("nobody@gmail.com", "Secret#123", "teacher").await;

    assert_eq!(wrong_status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_status, unknown_status);
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body["message"], "Invalid Email or Password");
}

#[tokio::test]
async fn test_login_requires_role() {
    let app = TestApp::new().await;
    app.signup("t@gmail.com").await;

    let (status, _) = app
        .call(
            Method::POST,
            "/teacher/login",
            None,
            Some(json!({ "email": "t@gmail.com", "password": "Secret#123" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.login("t@gmail.com", "Secret#123", "admin").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // A teacher's credentials are not valid in the student store
    let (status, _) = app.login("t@gmail.com", "Secret#123", "student").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_guards() {
    let app = TestApp::new().await;
    let teacher = app.teacher_token("t@gmail.com").await;

    let (status, _) = app.call(Method::GET, "/students/my-students", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .call(Method::GET, "/students/my-students", Some("not-a-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.call(Method::GET, "/courses/my-courses", Some(&teacher), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let foreign = TokenService::new("some-other-secret").issue(1, Role::Teacher).unwrap();
    let (status, _) = app
        .call(Method::GET, "/students/my-students", Some(&foreign), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let app = TestApp::new().await;
    app.signup("t@gmail.com").await;
    let account = app.db.get_account_by_email("t@gmail.com").await.unwrap().unwrap();

    let expired = TokenService::with_ttl(SECRET, chrono::Duration::seconds(-10))
        .issue(account.id, Role::Teacher)
        .unwrap();
    let (status, body) = app
        .call(Method::GET, "/students/my-students", Some(&expired), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "TOKEN_EXPIRED");
}

#[tokio::test]
async fn test_add_student_sends_password_and_hashes_it() {
    let app = TestApp::new().await;
    let teacher = app.teacher_token("t@gmail.com").await;
    let id = app.add_student(&teacher, "alan@gmail.com").await;

    let password = app.generated_password("alan@gmail.com").await;
    assert_eq!(password.len(), 8);

    let stored = app.db.get_student_by_id(id).await.unwrap().unwrap();
    assert_ne!(stored.password_hash, password);
    assert!(stored.password_hash.starts_with("$argon2"));

    let sent = app.outbox.sent.lock().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Your Account Password");
    assert!(sent[0].text.starts_with("Hello Alan Turing,"));
    drop(sent);

    app.student_token("alan@gmail.com").await;
}

#[tokio::test]
async fn test_add_student_rejects_duplicate_email() {
    let app = TestApp::new().await;
    let teacher = app.teacher_token("t@gmail.com").await;
    app.add_student(&teacher, "alan@gmail.com").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/students/add",
            Some(&teacher),
            Some(json!({
                "name": "Someone Else",
                "email": "alan@gmail.com",
                "course": "Physics",
                "dob": "2004-01-01",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "student with this email already exists");
}

#[tokio::test]
async fn test_student_response_has_no_password() {
    let app = TestApp::new().await;
    let teacher = app.teacher_token("t@gmail.com").await;
    app.add_student(&teacher, "alan@gmail.com").await;

    let (status, body) = app
        .call(Method::GET, "/students/my-students", Some(&teacher), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let student = &body[0];
    assert_eq!(student["email"], "alan@gmail.com");
    assert_eq!(student["dob"], "2005-06-23");
    assert!(student["age"].as_u64().is_some());
    assert!(student.get("password").is_none());
    assert!(student.get("passwordHash").is_none());
}

#[tokio::test]
async fn test_teachers_see_only_their_students() {
    let app = TestApp::new().await;
    let t1 = app.teacher_token("t1@gmail.com").await;
    let t2 = app.teacher_token("t2@gmail.com").await;

    let s1 = app.add_student(&t1, "s1@gmail.com").await;
    app.add_student(&t2, "s2@gmail.com").await;

    let (_, body) = app.call(Method::GET, "/students/my-students", Some(&t1), None).await;
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![s1]);
}

#[tokio::test]
async fn test_student_update_and_delete_enforce_ownership() {
    let app = TestApp::new().await;
    let t1 = app.teacher_token("t1@gmail.com").await;
    let t2 = app.teacher_token("t2@gmail.com").await;
    let id = app.add_student(&t1, "alan@gmail.com").await;

    let changes = json!({ "name": "Alan M. Turing", "course": "Logic", "dob": "2005-06-23" });

    let (status, _) = app
        .call(Method::PUT, &format!("/students/{}", id), Some(&t2), Some(changes.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .call(Method::DELETE, &format!("/students/{}", id), Some(&t2), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let unchanged = app.db.get_student_by_id(id).await.unwrap().unwrap();
    assert_eq!(unchanged.name, "Alan Turing");

    let (status, body) = app
        .call(Method::PUT, &format!("/students/{}", id), Some(&t1), Some(changes))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Alan M. Turing");
    assert_eq!(body["course"], "Logic");

    let (status, body) = app
        .call(Method::DELETE, &format!("/students/{}", id), Some(&t1), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "student deleted successfully");

    let (status, _) = app
        .call(Method::DELETE, &format!("/students/{}", id), Some(&t1), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_course_lifecycle() {
    let app = TestApp::new().await;
    let teacher = app.teacher_token("t@gmail.com").await;
    app.add_student(&teacher, "alan@gmail.com").await;
    let student = app.student_token("alan@gmail.com").await;

    let id = app.add_course(&student, "Algorithms", 301, 3).await;

    let (status, body) = app
        .call(
            Method::PUT,
            &format!("/courses/{}", id),
            Some(&student),
            Some(json!({ "courseName": "Advanced Algorithms", "courseCode": 401, "creditHour": 4 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Course updated successfully");
    assert_eq!(body["course"]["courseCode"], 401);

    let (status, body) = app
        .call(Method::DELETE, &format!("/courses/{}", id), Some(&student), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Course deleted successfully");

    let (status, _) = app
        .call(Method::DELETE, &format!("/courses/{}", id), Some(&student), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_course_ownership() {
    let app = TestApp::new().await;
    let teacher = app.teacher_token("t@gmail.com").await;
    app.add_student(&teacher, "s1@gmail.com").await;
    app.add_student(&teacher, "s2@gmail.com").await;
    let s1 = app.student_token("s1@gmail.com").await;
    let s2 = app.student_token("s2@gmail.com").await;

    let id = app.add_course(&s1, "Algorithms", 301, 3).await;

    let (status, _) = app
        .call(
            Method::PUT,
            &format!("/courses/{}", id),
            Some(&s2),
            Some(json!({ "courseName": "Stolen", "courseCode": 1, "creditHour": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .call(Method::DELETE, &format!("/courses/{}", id), Some(&s2), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let unchanged = app.db.get_course_by_id(id).await.unwrap().unwrap();
    assert_eq!(unchanged.course_name, "Algorithms");
    assert_eq!(unchanged.course_code, 301);
    assert_eq!(unchanged.credit_hour, 3);

    let (_, body) = app.call(Method::GET, "/courses/my-courses", Some(&s2), None).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_course_filters_are_or_combined() {
    let app = TestApp::new().await;
    let teacher = app.teacher_token("t@gmail.com").await;
    app.add_student(&teacher, "alan@gmail.com").await;
    let student = app.student_token("alan@gmail.com").await;

    app.add_course(&student, "Algorithms", 301, 3).await;
    app.add_course(&student, "Databases", 302, 4).await;
    app.add_course(&student, "Compilers", 401, 3).await;

    let names = |body: &Value| -> Vec<String> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|c| c["courseName"].as_str().unwrap().to_string())
            .collect()
    };

    let (status, body) = app.call(Method::GET, "/courses/my-courses", Some(&student), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body).len(), 3);

    let (_, body) = app
        .call(Method::GET, "/courses/my-courses?courseName=algo", Some(&student), None)
        .await;
    assert_eq!(names(&body), vec!["Algorithms"]);

    let (_, body) = app
        .call(
            Method::GET,
            "/courses/my-courses?courseName=data&courseCode=401",
            Some(&student),
            None,
        )
        .await;
    assert_eq!(names(&body), vec!["Databases", "Compilers"]);

    let (_, body) = app
        .call(
            Method::GET,
            "/courses/my-courses?courseName=&creditHour=4",
            Some(&student),
            None,
        )
        .await;
    assert_eq!(names(&body), vec!["Databases"]);

    let (status, _) = app
        .call(Method::GET, "/courses/my-courses?courseCode=abc", Some(&student), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_deleting_student_removes_courses_and_blocks_adds() {
    let app = TestApp::new().await;
    let teacher = app.teacher_token("t@gmail.com").await;
    let id = app.add_student(&teacher, "alan@gmail.com").await;
    let student = app.student_token("alan@gmail.com").await;
    let course = app.add_course(&student, "Algorithms", 301, 3).await;

    let (status, _) = app
        .call(Method::DELETE, &format!("/students/{}", id), Some(&teacher), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(app.db.get_course_by_id(course).await.unwrap().is_none());

    let (status, _) = app
        .call(
            Method::POST,
            "/courses/addCourse",
            Some(&student),
            Some(json!({ "courseName": "Orphan", "courseCode": 1, "creditHour": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::new().await;
    let (status, _) = app.call(Method::GET, "/nowhere", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

fn assert_validation_error(status: StatusCode, body: &Value) {
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["code"], "VALIDATION_ERROR", "{}", body);
    let message = body["message"].as_str().unwrap();
    assert!(!message.contains("line 1"), "{}", message);
}

#[tokio::test]
async fn test_missing_body_fields_are_validation_errors() {
    let app = TestApp::new().await;
    let teacher = app.teacher_token("t@gmail.com").await;
    let id = app.add_student(&teacher, "alan@gmail.com").await;

    let (status, body) = app
        .call(
            Method::PUT,
            &format!("/students/{}", id),
            Some(&teacher),
            Some(json!({ "name": "Alan M", "course": "Logic" })),
        )
        .await;
    assert_validation_error(status, &body);

    let (status, body) = app
        .call(
            Method::POST,
            "/teacher/login",
            None,
            Some(json!({ "password": "Secret#123", "role": "teacher" })),
        )
        .await;
    assert_validation_error(status, &body);

    let (status, body) = app
        .call(
            Method::POST,
            "/students/add",
            Some(&teacher),
            Some(json!({
                "name": "Alan Turing",
                "email": "other@gmail.com",
                "course": "Mathematics",
                "dob": "not-a-date",
            })),
        )
        .await;
    assert_validation_error(status, &body);
}

#[tokio::test]
async fn test_malformed_requests_are_validation_errors() {
    let app = TestApp::new().await;
    let teacher = app.teacher_token("t@gmail.com").await;

    let (status, body) = app
        .call(Method::DELETE, "/students/abc", Some(&teacher), None)
        .await;
    assert_validation_error(status, &body);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/teacher/signup")
        .body(Body::from(
            json!({
                "firstName": "Grace",
                "lastName": "Hopper",
                "email": "g@gmail.com",
                "password": "Secret#123",
            })
            .to_string(),
        ))
        .unwrap();
    let (status, body) = app.call_raw(request).await;
    assert_validation_error(status, &body);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/teacher/signup")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"firstName\":"))
        .unwrap();
    let (status, body) = app.call_raw(request).await;
    assert_validation_error(status, &body);
}

#[tokio::test]
async fn test_course_name_search_folds_non_ascii_case() {
    let app = TestApp::new().await;
    let teacher = app.teacher_token("t@gmail.com").await;
    app.add_student(&teacher, "alan@gmail.com").await;
    let student = app.student_token("alan@gmail.com").await;

    app.add_course(&student, "Éthique", 101, 2).await;
    app.add_course(&student, "Algorithms", 301, 3).await;

    for uri in [
        "/courses/my-courses?courseName=%C3%A9th",
        "/courses/my-courses?courseName=%C3%89TH",
    ] {
        let (status, body) = app.call(Method::GET, uri, Some(&student), None).await;
        assert_eq!(status, StatusCode::OK);
        let courses = body.as_array().unwrap();
        assert_eq!(courses.len(), 1, "{}", uri);
        assert_eq!(courses[0]["courseName"], "Éthique");
    }
}

#[tokio::test]
async fn test_failed_notification_does_not_affect_provisioning() {
    let app = TestApp::with_notifier(
        Arc::new(Refusing),
        Arc::new(Outbox::default()),
        Duration::from_secs(5),
    )
    .await;
    let teacher = app.teacher_token("t@gmail.com").await;

    app.add_student(&teacher, "alan@gmail.com").await;

    let stored = app.db.get_student_by_email("alan@gmail.com").await.unwrap();
    assert!(stored.is_some());
}

#[tokio::test]
async fn test_stalled_notification_does_not_delay_provisioning() {
    let app = TestApp::with_notifier(
        Arc::new(Stalled),
        Arc::new(Outbox::default()),
        Duration::from_secs(30),
    )
    .await;
    let teacher = app.teacher_token("t@gmail.com").await;

    let id = tokio::time::timeout(
        Duration::from_secs(5),
        app.add_student(&teacher, "alan@gmail.com"),
    )
    .await
    .expect("provisioning waited on the notifier");

    let stored = app.db.get_student_by_email("alan@gmail.com").await.unwrap().unwrap();
    assert_eq!(stored.id, id);
}

#[tokio::test]
async fn test_unsupported_recipient_is_provisioned_without_notice() {
    let app = TestApp::new().await;
    let teacher = app.teacher_token("t@gmail.com").await;

    app.add_student(&teacher, "alan@example.org").await;
    assert!(
        app.db
            .get_student_by_email("alan@example.org")
            .await
            .unwrap()
            .is_some()
    );

    // Give the detached delivery task time to run
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(app.outbox.sent.lock().await.is_empty());
}
