// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Message Bus Adapter (§4.B): a single-topic, competing-consumers bus
//! built on `async-nats` JetStream (see DESIGN.md for why NATS stands in
//! for the source's Kafka).

mod consumer;
mod error;
mod message;
mod producer;
mod subject;

pub use consumer::{BusConsumer, ConsumerMetrics, MessageHandler};
pub use error::BusError;
pub use message::BusMessage;
pub use producer::{BusProducer, InMemoryPublisher, Publisher};
pub use subject::TOPIC;
