use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use std::net::TcpListener;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct Student {
    id: String,
    name: String,
    roll_no: String,
}

#[derive(Debug, Deserialize)]
struct DaySummary {
    date: String,
    statuses: std::collections::BTreeMap<String, String>,
}

struct TestServer {
    base_url: String,
    data_dir: PathBuf,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn nanos() -> u128 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos()
}

fn unique_data_dir(label: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!(
        "coursework_hub_http_{label}_{}_{}",
        std::process::id(),
        nanos()
    ));
    std::fs::create_dir_all(&path).expect("create data dir");
    path
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/projects")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server(data_dir: PathBuf) -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_coursework_hub"))
        .env("PORT", port.to_string())
        .env("APP_DATA_DIR", &data_dir)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer {
        base_url,
        data_dir,
        child,
    }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server(unique_data_dir("shared")).await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn get_json(client: &Client, url: String) -> Value {
    let resp = client.get(url).send().await.unwrap();
    assert!(resp.status().is_success(), "GET failed: {}", resp.status());
    resp.json().await.unwrap()
}

#[tokio::test]
async fn http_dashboard_lists_projects() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let html = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("Attendance System"));
    assert!(html.contains("Expense Tracker"));

    let projects = get_json(&client, format!("{}/api/projects", server.base_url)).await;
    let projects = projects.as_array().unwrap();
    assert_eq!(projects.len(), 9);
    assert!(projects.iter().all(|p| p["link"].as_str().unwrap().starts_with("/api/")));
}

#[tokio::test]
async fn http_calculators() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let product = get_json(
        &client,
        format!("{}/api/calc/arith?a=6&b=3&op=*", server.base_url),
    )
    .await;
    assert_eq!(product["result"], json!(18.0));

    let resp = client
        .get(format!("{}/api/calc/arith?a=1&b=0&op=/", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.text().await.unwrap(), "Cannot divide by zero");

    let resp = client
        .get(format!("{}/api/calc/sum?a=&b=2", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let parity = get_json(&client, format!("{}/api/calc/parity?n=7", server.base_url)).await;
    assert_eq!(parity["result"], json!("odd"));

    let grade = get_json(
        &client,
        format!("{}/api/calc/grade?m1=95&m2=90&m3=92", server.base_url),
    )
    .await;
    assert_eq!(grade["result"]["grade"], json!("A"));

    let library = get_json(
        &client,
        format!(
            "{}/api/calc/library?has_card=true&is_student=false",
            server.base_url
        ),
    )
    .await;
    assert_eq!(library["access"], json!("not_a_student"));

    let resp = client
        .get(format!(
            "{}/api/calc/voting?birth_year=-2147483648",
            server.base_url
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.text().await.unwrap(),
        "Birth year -2147483648 is out of range"
    );
}

#[tokio::test]
async fn http_counter_increase_and_decrease() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let url = format!("{}/api/counter", server.base_url);

    let start = get_json(&client, url.clone()).await["value"].as_i64().unwrap();

    for action in ["increase", "increase", "decrease"] {
        let resp = client
            .post(&url)
            .json(&json!({ "action": action }))
            .send()
            .await
            .unwrap();
        assert!(resp.status().is_success());
    }
    let value = get_json(&client, url.clone()).await["value"].as_i64().unwrap();
    assert_eq!(value, start + 1);

    let resp = client
        .post(&url)
        .json(&json!({ "action": "reset" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_attendance_flow() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let roll = format!("t-{}", nanos() % 1_000_000);

    let resp = client
        .post(format!("{}/api/attendance/students", server.base_url))
        .json(&json!({ "name": "Test Student", "roll_no": roll }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let outcome: Value = resp.json().await.unwrap();
    assert_eq!(outcome["event"], json!("student_added"));
    let student: Student = serde_json::from_value(outcome["student"].clone()).unwrap();
    assert_eq!(student.name, "Test Student");
    assert_eq!(student.roll_no, roll.to_uppercase());

    let duplicate = client
        .post(format!("{}/api/attendance/students", server.base_url))
        .json(&json!({ "name": "Other", "roll_no": roll.to_uppercase() }))
        .send()
        .await
        .unwrap();
    assert_eq!(duplicate.status(), StatusCode::BAD_REQUEST);
    assert_eq!(duplicate.text().await.unwrap(), "Roll number already exists");

    let records_url = format!("{}/api/attendance/records", server.base_url);
    let before: Vec<DaySummary> = client.get(&records_url).send().await.unwrap().json().await.unwrap();

    for (date, status) in [("2030-01-07", "present"), ("2030-01-08", "absent")] {
        let resp = client
            .put(format!("{records_url}/{date}"))
            .json(&json!({ "marks": { student.id.clone(): status, "s2": "present" } }))
            .send()
            .await
            .unwrap();
        assert!(resp.status().is_success());
    }

    // saving the same date again replaces it
    let resp = client
        .put(format!("{records_url}/2030-01-08"))
        .json(&json!({ "marks": { student.id.clone(): "absent" } }))
        .send()
        .await
        .unwrap();
    let outcome: Value = resp.json().await.unwrap();
    assert_eq!(outcome["created"], json!(false));

    let after: Vec<DaySummary> = client.get(&records_url).send().await.unwrap().json().await.unwrap();
    assert_eq!(after.len(), before.len() + 2);

    let analytics = get_json(
        &client,
        format!("{}/api/attendance/analytics", server.base_url),
    )
    .await;
    let entry = analytics["students"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["student"]["id"] == json!(student.id))
        .expect("student in analytics");
    assert_eq!(entry["stats"]["pct"], json!(50.0));
    assert_eq!(entry["band"], json!("warning"));

    let marks = get_json(
        &client,
        format!("{}/api/attendance/marks?date=2030-01-07", server.base_url),
    )
    .await;
    assert_eq!(marks["saved"], json!(true));

    let resp = client
        .delete(format!(
            "{}/api/attendance/students/{}",
            server.base_url, student.id
        ))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());

    let after: Vec<DaySummary> = client.get(&records_url).send().await.unwrap().json().await.unwrap();
    let jan7 = after.iter().find(|d| d.date == "2030-01-07").unwrap();
    assert!(!jan7.statuses.contains_key(&student.id));
    assert_eq!(jan7.statuses.get("s2").map(String::as_str), Some("present"));

    let resp = client
        .put(format!("{records_url}/not-a-date"))
        .json(&json!({ "marks": {} }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_expense_flow() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let txns_url = format!("{}/api/expenses/transactions", server.base_url);

    let bad = client
        .post(&txns_url)
        .json(&json!({ "type": "expense", "amount": "abc", "description": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
    assert_eq!(bad.text().await.unwrap(), "Enter a valid amount");

    let mut ids = Vec::new();
    for (kind, amount, category) in [
        ("expense", json!(75.0), "Food & Dining"),
        ("expense", json!("25"), "Transport"),
        ("income", json!(1000), "Salary"),
    ] {
        let resp = client
            .post(&txns_url)
            .json(&json!({
                "type": kind,
                "amount": amount,
                "description": format!("{category} test"),
                "category": category,
                "date": "2031-05-04",
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let outcome: Value = resp.json().await.unwrap();
        ids.push(outcome["transaction"]["id"].as_str().unwrap().to_string());
    }

    let summary = get_json(
        &client,
        format!("{}/api/expenses/summary?month=2031-05", server.base_url),
    )
    .await;
    assert_eq!(summary["summary"]["expense"], json!(100.0));
    assert_eq!(summary["summary"]["balance"], json!(900.0));
    let breakdown = summary["breakdown"].as_array().unwrap();
    assert_eq!(breakdown[0]["category"], json!("Food & Dining"));
    assert_eq!(breakdown[0]["pct"], json!(75.0));

    let months = get_json(&client, format!("{}/api/expenses/months", server.base_url)).await;
    assert!(months.as_array().unwrap().contains(&json!("2031-05")));

    let resp = client
        .patch(format!("{txns_url}/{}", ids[0]))
        .json(&json!({ "amount": 25 }))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());

    let resp = client
        .delete(format!("{txns_url}/{}", ids[1]))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());

    let summary = get_json(
        &client,
        format!("{}/api/expenses/summary?month=2031-05", server.base_url),
    )
    .await;
    assert_eq!(summary["summary"]["expense"], json!(25.0));

    let resp = client
        .get(format!("{}/api/expenses/summary?month=May", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_malformed_store_falls_back_to_defaults() {
    let _guard = TEST_LOCK.lock().await;
    let data_dir = unique_data_dir("corrupt");
    std::fs::write(data_dir.join("attendance-students.json"), b"[{broken").unwrap();

    let server = spawn_server(data_dir).await;
    let client = Client::new();

    let students: Vec<Student> = client
        .get(format!("{}/api/attendance/students", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(students.len(), 10);
    assert_eq!(students[0].id, "s1");

    let kept = std::fs::read(server.data_dir.join("attendance-students.corrupt.json")).unwrap();
    assert_eq!(kept, b"[{broken");
}
