use crate::attendance::AttendanceBook;
use crate::counter::Counter;
use crate::ledger::Ledger;
use crate::storage::JsonStore;
use std::sync::Arc;
use tokio::sync::Mutex;

/// One lock per screen; a command holds it until its write has finished.
#[derive(Clone)]
pub struct AppState {
    pub attendance: Arc<Mutex<AttendanceBook>>,
    pub ledger: Arc<Mutex<Ledger>>,
    pub counter: Arc<Mutex<Counter>>,
}

impl AppState {
    pub async fn load(store: &JsonStore) -> Self {
        let attendance = AttendanceBook::load(store).await;
        let ledger = Ledger::load(store).await;
        Self {
            attendance: Arc::new(Mutex::new(attendance)),
            ledger: Arc::new(Mutex::new(ledger)),
            counter: Arc::new(Mutex::new(Counter::default())),
        }
    }
}
