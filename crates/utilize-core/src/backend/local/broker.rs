//! In-process message queues

use std::collections::VecDeque;

use parking_lot::Mutex;
use serde_json::Value;

use crate::backend::{BrokerQueues, QueueName};

/// FIFO queue of structured messages.
#[derive(Debug)]
pub struct MessageQueue {
    name: QueueName,
    items: Mutex<VecDeque<Value>>,
}

impl MessageQueue {
    pub fn new(name: QueueName) -> Self {
        Self {
            name,
            items: Mutex::new(VecDeque::new()),
        }
    }

    pub fn name(&self) -> QueueName {
        self.name
    }

    pub fn push(&self, message: Value) {
        self.items.lock().push_back(message);
    }

    pub fn pop(&self) -> Option<Value> {
        self.items.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Routes messages between the job, result, reject and serialize queues.
#[derive(Debug)]
pub struct MessageBroker {
    queues: BrokerQueues<MessageQueue>,
}

impl MessageBroker {
    pub fn new(queues: BrokerQueues<MessageQueue>) -> Self {
        Self { queues }
    }

    pub fn queue(&self, name: QueueName) -> &MessageQueue {
        self.queues.get(name)
    }

    pub fn publish(&self, name: QueueName, message: Value) {
        tracing::trace!(queue = %name, "publish");
        self.queue(name).push(message);
    }

    pub fn consume(&self, name: QueueName) -> Option<Value> {
        self.queue(name).pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_queues_are_independent_and_fifo() {
        let broker = MessageBroker::new(
            BrokerQueues::try_build(|name| Ok::<_, ()>(MessageQueue::new(name))).unwrap(),
        );

        broker.publish(QueueName::Job, json!(1));
        broker.publish(QueueName::Job, json!(2));
        broker.publish(QueueName::Reject, json!("bad"));

        assert_eq!(broker.consume(QueueName::Job), Some(json!(1)));
        assert_eq!(broker.consume(QueueName::Job), Some(json!(2)));
        assert_eq!(broker.consume(QueueName::Job), None);
        assert_eq!(broker.queue(QueueName::Reject).len(), 1);
        assert!(broker.queue(QueueName::Result).is_empty());
        assert_eq!(broker.queue(QueueName::Serialize).name(), QueueName::Serialize);
    }
}
