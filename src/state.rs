use std::sync::Arc;

use parking_lot::Mutex;

use crate::client::Classifier;
use crate::exchange::ExchangeLog;
use crate::form::FormState;
use crate::list::ListView;

/// Page-level state shared by the submission form and the email list.
///
/// Lock order is `form`, then `exchanges`, then `list`. No guard is ever
/// held across an `.await`.
pub struct AppState {
    pub form: Arc<Mutex<FormState>>,
    pub exchanges: Arc<Mutex<ExchangeLog>>,
    pub list: Arc<Mutex<ListView>>,
    classifier: Arc<dyn Classifier>,
}

impl AppState {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            form: Arc::new(Mutex::new(FormState::new())),
            exchanges: Arc::new(Mutex::new(ExchangeLog::new())),
            list: Arc::new(Mutex::new(ListView::new())),
            classifier,
        }
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }
}
