use std::sync::{Arc, Mutex};
use std::time::Duration;

use daikin_ir::{
    AcController, AcMode, CommandLogMode, DisplayUnit, Error, Event, ModeCapabilities, Outcome,
};
use tempfile::NamedTempFile;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_ack(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/ac"))
        .respond_with(ResponseTemplate::new(204))
        .mount(server)
        .await;
}

fn controller(server: &MockServer, caps: ModeCapabilities) -> AcController {
    AcController::builder(format!("{}/ac", server.uri()))
        .capabilities(caps)
        .build()
        .expect("controller should build")
}

async fn last_query(server: &MockServer) -> String {
    let requests = server.received_requests().await.unwrap();
    let last = requests.last().expect("at least one request");
    last.url.query().unwrap_or("").to_string()
}

#[tokio::test]
async fn power_on_sends_full_query() {
    let server = MockServer::start().await;
    mount_ack(&server).await;

    let ctl = controller(&server, ModeCapabilities::four_mode());
    let outcome = ctl.set_power(true).await.expect("set_power should succeed");

    assert_eq!(outcome, Outcome::Committed);
    assert_eq!(
        last_query(&server).await,
        "power=true&mode=cold&temp=25&swing=true&powerful=false"
    );
    assert!(ctl.power());
}

#[tokio::test]
async fn power_off_sends_only_power() {
    let server = MockServer::start().await;
    mount_ack(&server).await;

    let ctl = controller(&server, ModeCapabilities::five_mode());
    ctl.set_power(true).await.unwrap();
    ctl.set_power(false).await.unwrap();

    assert_eq!(last_query(&server).await, "power=false");
    assert!(!ctl.power());
}

#[tokio::test]
async fn mode_round_trip_resets_to_mode_default() {
    let server = MockServer::start().await;
    mount_ack(&server).await;

    let ctl = controller(&server, ModeCapabilities::two_mode());
    assert_eq!(ctl.target_temperature(), 25.0);

    ctl.set_mode(AcMode::Heat).await.unwrap();
    assert_eq!(ctl.mode(), AcMode::Heat);
    assert_eq!(ctl.target_temperature(), 19.0);

    ctl.set_mode(AcMode::Cool).await.unwrap();
    assert_eq!(ctl.mode(), AcMode::Cool);
    assert_eq!(ctl.target_temperature(), 25.0);
}

#[tokio::test]
async fn rejected_commit_keeps_previous_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ac"))
        .respond_with(ResponseTemplate::new(500).set_body_string("ir send failed"))
        .expect(1)
        .mount(&server)
        .await;

    let ctl = controller(&server, ModeCapabilities::two_mode());
    let err = ctl.set_mode(AcMode::Heat).await.unwrap_err();

    assert!(
        matches!(err, Error::Remote { status: 500, ref body } if body == "ir send failed"),
        "expected Remote, got {err:?}"
    );
    assert_eq!(ctl.mode(), AcMode::Cool);
    assert_eq!(ctl.target_temperature(), 25.0);
}

#[tokio::test]
async fn transport_failure_keeps_previous_state() {
    let ctl = AcController::builder("http://127.0.0.1:1/ac")
        .capabilities(ModeCapabilities::two_mode())
        .build()
        .unwrap();

    let err = ctl.set_mode(AcMode::Heat).await.unwrap_err();
    assert!(matches!(err, Error::Http(_)), "expected Http, got {err:?}");
    assert_eq!(ctl.mode(), AcMode::Cool);
    assert!(!ctl.power());
}

#[tokio::test]
async fn timeout_is_a_commit_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(204).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let ctl = AcController::builder(format!("{}/ac", server.uri()))
        .timeout(Duration::from_millis(50))
        .build()
        .unwrap();

    let err = ctl.set_power(true).await.unwrap_err();
    assert!(matches!(err, Error::Timeout), "expected Timeout, got {err:?}");
    assert!(!ctl.power());
}

#[tokio::test]
async fn messages_body_is_an_acknowledgment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("power", "true"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"messages": ["sent cold 25"]})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("power", "false"))
        .respond_with(
            ResponseTemplate::new(503)
                .set_body_json(serde_json::json!({"messages": ["queued"]})),
        )
        .mount(&server)
        .await;

    let ctl = controller(&server, ModeCapabilities::two_mode());
    assert_eq!(ctl.set_power(true).await.unwrap(), Outcome::Committed);
    assert_eq!(ctl.set_power(false).await.unwrap(), Outcome::Committed);
    assert!(!ctl.power());
}

#[tokio::test]
async fn plain_body_on_success_commits() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&server)
        .await;

    let ctl = controller(&server, ModeCapabilities::two_mode());
    ctl.set_power(true).await.unwrap();
    assert!(ctl.power());
}

#[tokio::test]
async fn repeated_boost_sends_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("powerful", "true"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    mount_ack(&server).await;

    let ctl = controller(&server, ModeCapabilities::four_mode());
    ctl.set_power(true).await.unwrap();

    assert_eq!(ctl.set_boost(true).await.unwrap(), Outcome::Committed);
    assert_eq!(ctl.set_boost(true).await.unwrap(), Outcome::Suppressed);
    assert!(ctl.boost());
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn unsupported_mode_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let ctl = controller(&server, ModeCapabilities::two_mode());
    let err = ctl.set_mode(AcMode::Auto).await.unwrap_err();
    assert!(matches!(err, Error::InvalidRequestedMode(_)));
    assert_eq!(ctl.mode(), AcMode::Cool);
}

#[tokio::test]
async fn out_of_range_temperature_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let ctl = controller(&server, ModeCapabilities::two_mode());
    let err = ctl.set_target_temperature(35.0).await.unwrap_err();
    assert!(matches!(err, Error::TemperatureOutOfRange { mode: AcMode::Cool, .. }));
    assert_eq!(ctl.target_temperature(), 25.0);
}

#[tokio::test]
async fn target_temperature_uses_display_unit() {
    let server = MockServer::start().await;
    mount_ack(&server).await;

    let ctl = controller(&server, ModeCapabilities::two_mode());
    ctl.set_display_unit(DisplayUnit::Fahrenheit);
    ctl.set_power(true).await.unwrap();
    ctl.set_target_temperature(54.0).await.unwrap();

    assert_eq!(ctl.state().target_temperature, 22.0);
    assert_eq!(ctl.target_temperature(), 54.0);
    assert_eq!(last_query(&server).await, "power=true&mode=cold&temp=22&swing=true");
}

#[tokio::test]
async fn commit_fires_events_with_display_value() {
    let server = MockServer::start().await;
    mount_ack(&server).await;

    let events: Arc<Mutex<Vec<Event>>> = Arc::new(Mutex::new(vec![]));
    let events_clone = events.clone();
    let ctl = AcController::builder(format!("{}/ac", server.uri()))
        .display_unit(DisplayUnit::Fahrenheit)
        .on_event(move |event| {
            events_clone.lock().unwrap().push(event.clone());
        })
        .build()
        .unwrap();

    ctl.set_mode_with_power(AcMode::Heat, true).await.unwrap();

    let captured = events.lock().unwrap();
    assert_eq!(
        *captured,
        vec![
            Event::PowerChanged { power: true },
            Event::ModeChanged { mode: AcMode::Heat },
            Event::TargetTemperatureChanged {
                celsius: 19.0,
                display: 51.0
            },
        ]
    );
}

#[tokio::test]
async fn failed_commit_fires_no_events() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let events: Arc<Mutex<Vec<Event>>> = Arc::new(Mutex::new(vec![]));
    let events_clone = events.clone();
    let ctl = AcController::builder(format!("{}/ac", server.uri()))
        .on_event(move |event| {
            events_clone.lock().unwrap().push(event.clone());
        })
        .build()
        .unwrap();

    assert!(ctl.set_power(true).await.is_err());
    assert!(events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn concurrent_setters_do_not_lose_commits() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(204).set_delay(Duration::from_millis(100)))
        .mount(&server)
        .await;

    let ctl = Arc::new(controller(&server, ModeCapabilities::four_mode()));
    let a = ctl.clone();
    let b = ctl.clone();
    let (power, swing) = tokio::join!(
        tokio::spawn(async move { a.set_power(true).await }),
        tokio::spawn(async move { b.set_swing(false).await }),
    );
    power.unwrap().unwrap();
    swing.unwrap().unwrap();

    let state = ctl.state();
    assert!(state.power);
    assert!(!state.swing);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn resend_repeats_current_state() {
    let server = MockServer::start().await;
    mount_ack(&server).await;

    let ctl = controller(&server, ModeCapabilities::two_mode());
    ctl.set_power(true).await.unwrap();
    ctl.resend().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].url.query(), requests[1].url.query());
}

#[tokio::test]
async fn reselecting_mode_resets_temperature() {
    let server = MockServer::start().await;
    mount_ack(&server).await;

    let ctl = controller(&server, ModeCapabilities::two_mode());
    ctl.set_power(true).await.unwrap();
    ctl.set_target_temperature(22.0).await.unwrap();
    ctl.set_mode(AcMode::Cool).await.unwrap();

    assert_eq!(ctl.target_temperature(), 25.0);
    assert_eq!(
        last_query(&server).await,
        "power=true&mode=cold&temp=25&swing=true"
    );
}

#[tokio::test]
async fn swing_is_sent_without_boost_support() {
    let server = MockServer::start().await;
    mount_ack(&server).await;

    let ctl = controller(&server, ModeCapabilities::two_mode());
    ctl.set_power(true).await.unwrap();
    assert_eq!(ctl.set_swing(false).await.unwrap(), Outcome::Committed);

    assert!(!ctl.swing());
    assert_eq!(
        last_query(&server).await,
        "power=true&mode=cold&temp=25&swing=false"
    );
}

#[tokio::test]
async fn committed_temperature_matches_sent_value() {
    let server = MockServer::start().await;
    mount_ack(&server).await;

    let ctl = controller(&server, ModeCapabilities::two_mode());
    ctl.set_power(true).await.unwrap();
    ctl.set_target_temperature(22.6).await.unwrap();

    assert_eq!(ctl.state().target_temperature, 23.0);
    assert_eq!(
        last_query(&server).await,
        "power=true&mode=cold&temp=23&swing=true"
    );
}

#[tokio::test]
async fn dry_request_resends_when_already_dry() {
    let server = MockServer::start().await;
    mount_ack(&server).await;

    let ctl = controller(&server, ModeCapabilities::five_mode());
    ctl.set_mode_with_power(AcMode::Dry, true).await.unwrap();
    ctl.set_dry(true).await.unwrap();
    ctl.set_dry(false).await.unwrap();
    ctl.set_dry(false).await.unwrap();

    let queries: Vec<_> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.url.query().unwrap_or("").to_string())
        .collect();
    assert_eq!(
        queries,
        vec![
            "power=true&mode=dry&temp=0&swing=true&powerful=false",
            "power=true&mode=dry&temp=0&swing=true&powerful=false",
            "power=true&mode=auto&temp=0&swing=true&powerful=false",
            "power=true&mode=auto&temp=0&swing=true&powerful=false",
        ]
    );
    assert_eq!(ctl.mode(), AcMode::Auto);
}

#[tokio::test]
async fn command_log_records_commits_and_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("power", "true"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"messages": ["sent cold 25"]})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("power", "false"))
        .respond_with(ResponseTemplate::new(500).set_body_string("ir send failed"))
        .mount(&server)
        .await;

    let tmp = NamedTempFile::new().unwrap();
    let log_path = tmp.path().to_str().unwrap().to_string();
    let ctl = AcController::builder(format!("{}/ac", server.uri()))
        .command_log(CommandLogMode::Diffed, &log_path)
        .build()
        .unwrap();

    ctl.set_power(true).await.unwrap();
    assert!(ctl.set_power(false).await.is_err());

    let contents = std::fs::read_to_string(&log_path).unwrap();
    let lines: Vec<serde_json::Value> = contents
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    let dirs: Vec<_> = lines.iter().map(|l| l["dir"].as_str().unwrap()).collect();
    assert_eq!(dirs, vec!["req", "commit", "req", "fail"]);

    assert!(lines[0]["url"].as_str().unwrap().ends_with("?power=true&mode=cold&temp=25&swing=true"));
    assert_eq!(lines[1]["full"], true);
    assert_eq!(lines[1]["state"]["power"], true);
    assert_eq!(lines[1]["message"], "sent cold 25");
    assert!(lines[2]["url"].as_str().unwrap().ends_with("?power=false"));
    assert!(lines[3]["error"].as_str().unwrap().contains("500"));
    assert!(ctl.power());
}
