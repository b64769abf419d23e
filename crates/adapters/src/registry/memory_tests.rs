use super::*;
use async_trait::async_trait;
use sg_core::StartError;
use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Test service with configurable outcome
#[derive(Default)]
struct Probe {
    fail: bool,
    delay: Option<Duration>,
    child: Option<UnitName>,
    starts: AtomicUsize,
    stops: AtomicUsize,
}

#[async_trait]
impl Service for Probe {
    async fn start(&self, ctx: &StartContext) -> Result<(), StartError> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(child) = &self.child {
            ctx.child_target()
                .install(UnitSpec::new(child.clone(), Arc::new(Probe::default())))
                .map_err(|e| StartError::new(e.to_string()))?;
        }
        if self.fail {
            return Err(StartError::new("boom"));
        }
        Ok(())
    }

    async fn stop(&self, _ctx: &StopContext) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Records every transition it sees
#[derive(Default)]
struct Recorder {
    seen: Mutex<Vec<(UnitName, Transition)>>,
}

impl Recorder {
    fn for_unit(&self, name: &UnitName) -> Vec<Transition> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, t)| *t)
            .collect()
    }
}

impl TransitionListener for Recorder {
    fn on_transition(&self, name: &UnitName, transition: Transition) {
        self.seen.lock().unwrap().push((name.clone(), transition));
    }
}

fn name(s: &str) -> UnitName {
    UnitName::parse(s).unwrap()
}

async fn settle(registry: &InMemoryRegistry, unit: &str, state: UnitState) {
    tokio::time::timeout(
        Duration::from_secs(5),
        registry.wait_for(&name(unit), state),
    )
    .await
    .unwrap_or_else(|_| panic!("{unit} never reached {state}"));
}

#[tokio::test]
async fn unit_without_dependencies_starts() {
    let registry = InMemoryRegistry::current().unwrap();
    let recorder = Arc::new(Recorder::default());
    registry
        .subscribe(SubscriberId::new("rec"), recorder.clone())
        .unwrap();

    registry
        .install(UnitSpec::new(name("a"), Arc::new(Probe::default())))
        .unwrap();
    settle(&registry, "a", UnitState::Running).await;

    assert_eq!(
        recorder.for_unit(&name("a")),
        vec![Transition::IdleToStarting, Transition::StartingToUp]
    );
}

#[tokio::test]
async fn dependant_waits_for_dependency() {
    let registry = InMemoryRegistry::current().unwrap();

    registry
        .install(UnitSpec::new(name("b"), Arc::new(Probe::default())).with_dependency(name("a")))
        .unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(registry.state(&name("b")), Some(UnitState::Idle));

    registry
        .install(UnitSpec::new(name("a"), Arc::new(Probe::default())))
        .unwrap();
    settle(&registry, "b", UnitState::Running).await;
}

#[tokio::test]
async fn failed_dependency_blocks_dependant() {
    let registry = InMemoryRegistry::current().unwrap();
    let failing = Probe {
        fail: true,
        ..Default::default()
    };

    registry
        .install(UnitSpec::new(name("a"), Arc::new(failing)))
        .unwrap();
    registry
        .install(UnitSpec::new(name("b"), Arc::new(Probe::default())).with_dependency(name("a")))
        .unwrap();
    settle(&registry, "a", UnitState::StartFailed).await;

    assert_eq!(registry.start_error(&name("a")).as_deref(), Some("boom"));
    assert_eq!(registry.state(&name("b")), Some(UnitState::Idle));
}

#[tokio::test]
async fn duplicate_install_is_rejected() {
    let registry = InMemoryRegistry::current().unwrap();
    registry
        .install(UnitSpec::new(name("a"), Arc::new(Probe::default())))
        .unwrap();

    let err = registry
        .install(UnitSpec::new(name("a"), Arc::new(Probe::default())))
        .unwrap_err();
    assert_eq!(err, RegistryError::DuplicateUnit(name("a")));
}

#[tokio::test]
async fn child_requires_installed_parent() {
    let registry = InMemoryRegistry::current().unwrap();
    let err = registry
        .install(UnitSpec::new(name("p.c"), Arc::new(Probe::default())).with_parent(name("p")))
        .unwrap_err();
    assert_eq!(err, RegistryError::UnitNotFound(name("p")));
}

#[tokio::test]
async fn duplicate_subscriber_is_rejected() {
    let registry = InMemoryRegistry::current().unwrap();
    let recorder = Arc::new(Recorder::default());
    registry
        .subscribe(SubscriberId::new("rec"), recorder.clone())
        .unwrap();

    let err = registry
        .subscribe(SubscriberId::new("rec"), recorder)
        .unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateSubscriber(_)));
    assert_eq!(registry.subscriber_count(), 1);
}

#[tokio::test]
async fn unsubscribed_listener_sees_nothing_more() {
    let registry = InMemoryRegistry::current().unwrap();
    let recorder = Arc::new(Recorder::default());
    registry
        .subscribe(SubscriberId::new("rec"), recorder.clone())
        .unwrap();

    assert!(registry.unsubscribe(&SubscriberId::new("rec")));
    assert!(!registry.unsubscribe(&SubscriberId::new("rec")));

    registry
        .install(UnitSpec::new(name("a"), Arc::new(Probe::default())))
        .unwrap();
    settle(&registry, "a", UnitState::Running).await;
    assert!(recorder.for_unit(&name("a")).is_empty());
}

#[tokio::test]
async fn stop_tears_down_children_and_dependants() {
    let registry = InMemoryRegistry::current().unwrap();
    let parent = Arc::new(Probe {
        child: Some(name("p.child")),
        ..Default::default()
    });
    let dependant = Arc::new(Probe::default());

    registry
        .install(UnitSpec::new(name("p"), parent.clone()))
        .unwrap();
    registry
        .install(UnitSpec::new(name("d"), dependant.clone()).with_dependency(name("p")))
        .unwrap();
    settle(&registry, "p.child", UnitState::Running).await;
    settle(&registry, "d", UnitState::Running).await;

    registry.stop(&name("p")).await.unwrap();

    assert_eq!(registry.state(&name("p")), Some(UnitState::Stopped));
    assert_eq!(registry.state(&name("d")), Some(UnitState::Stopped));
    assert_eq!(registry.state(&name("p.child")), None);
    assert_eq!(parent.stops.load(Ordering::SeqCst), 1);
    assert_eq!(dependant.stops.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn stop_order_puts_dependants_first() {
    let registry = InMemoryRegistry::current().unwrap();
    let recorder = Arc::new(Recorder::default());
    registry
        .subscribe(SubscriberId::new("rec"), recorder.clone())
        .unwrap();

    registry
        .install(UnitSpec::new(name("a"), Arc::new(Probe::default())))
        .unwrap();
    registry
        .install(UnitSpec::new(name("b"), Arc::new(Probe::default())).with_dependency(name("a")))
        .unwrap();
    settle(&registry, "b", UnitState::Running).await;

    registry.stop(&name("a")).await.unwrap();

    let stops: Vec<UnitName> = recorder
        .seen
        .lock()
        .unwrap()
        .iter()
        .filter(|(_, t)| *t == Transition::StoppingToStopped)
        .map(|(n, _)| n.clone())
        .collect();
    assert_eq!(stops, vec![name("b"), name("a")]);
}

#[tokio::test]
async fn stop_unknown_unit_fails() {
    let registry = InMemoryRegistry::current().unwrap();
    let err = registry.stop(&name("ghost")).await.unwrap_err();
    assert_eq!(err, RegistryError::UnitNotFound(name("ghost")));
}

#[tokio::test]
async fn failed_unit_can_be_stopped() {
    let registry = InMemoryRegistry::current().unwrap();
    let recorder = Arc::new(Recorder::default());
    registry
        .subscribe(SubscriberId::new("rec"), recorder.clone())
        .unwrap();
    registry
        .install(UnitSpec::new(
            name("a"),
            Arc::new(Probe {
                fail: true,
                ..Default::default()
            }),
        ))
        .unwrap();
    settle(&registry, "a", UnitState::StartFailed).await;

    registry.shutdown().await;

    assert_eq!(
        recorder.for_unit(&name("a")),
        vec![
            Transition::IdleToStarting,
            Transition::StartingToStartFailed,
            Transition::StartFailedToStopping,
            Transition::StoppingToStopped,
        ]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_starts_each_run_once() {
    let registry = InMemoryRegistry::current().unwrap();
    let root = Arc::new(Probe {
        delay: Some(Duration::from_millis(10)),
        ..Default::default()
    });
    let leaves: Vec<Arc<Probe>> = (0..16).map(|_| Arc::new(Probe::default())).collect();

    for (i, leaf) in leaves.iter().enumerate() {
        registry
            .install(
                UnitSpec::new(name(&format!("leaf{i}")), leaf.clone())
                    .with_dependency(name("root")),
            )
            .unwrap();
    }
    registry
        .install(UnitSpec::new(name("root"), root.clone()))
        .unwrap();

    for i in 0..16 {
        settle(&registry, &format!("leaf{i}"), UnitState::Running).await;
    }
    assert_eq!(root.starts.load(Ordering::SeqCst), 1);
    for leaf in &leaves {
        assert_eq!(leaf.starts.load(Ordering::SeqCst), 1);
    }
}

#[test]
fn current_fails_outside_runtime() {
    let err = InMemoryRegistry::current().err().unwrap();
    assert!(matches!(err, RegistryError::Unavailable(_)));
}
