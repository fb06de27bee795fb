//! Scripted in-memory provider used by unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_s3::types::Grant;
use bytes::Bytes;
use parking_lot::Mutex;

use crate::client::{BucketClient, ClientFactory, DatacenterCredentials};
use crate::error::ProviderError;
use crate::publish::{PublishError, Publisher};

/// A provider call observed by [`MockFactory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Client {
        region: String,
        access_key_id: String,
    },
    Create {
        name: String,
        acl: String,
        location: String,
    },
    Wait {
        name: String,
    },
    PutAcl {
        bucket: String,
        acl: String,
        grants: usize,
    },
    Delete {
        name: String,
    },
}

/// Failure and response script for a [`MockFactory`].
#[derive(Debug, Default, Clone)]
pub struct Script {
    pub location: Option<String>,
    pub fail_create: Option<String>,
    pub fail_wait: Option<String>,
    pub fail_acl: Option<String>,
    pub fail_delete: Option<String>,
}

#[derive(Debug, Default)]
struct Recorder {
    calls: Mutex<Vec<Call>>,
    grants: Mutex<Vec<Grant>>,
}

/// Client factory whose clients record every call and follow a [`Script`].
#[derive(Debug, Clone, Default)]
pub struct MockFactory {
    script: Arc<Script>,
    recorder: Arc<Recorder>,
}

impl MockFactory {
    pub fn new(script: Script) -> Self {
        Self {
            script: Arc::new(script),
            recorder: Arc::default(),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.recorder.calls.lock().clone()
    }

    /// Provider calls only, without client constructions.
    pub fn provider_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::Client { .. }))
            .collect()
    }

    pub fn last_grants(&self) -> Vec<Grant> {
        self.recorder.grants.lock().clone()
    }
}

impl ClientFactory for MockFactory {
    type Client = MockClient;

    fn client(&self, credentials: DatacenterCredentials<'_>) -> MockClient {
        self.recorder.calls.lock().push(Call::Client {
            region: credentials.region.to_owned(),
            access_key_id: credentials.access_key_id.to_owned(),
        });
        MockClient {
            script: Arc::clone(&self.script),
            recorder: Arc::clone(&self.recorder),
        }
    }
}

#[derive(Debug)]
pub struct MockClient {
    script: Arc<Script>,
    recorder: Arc<Recorder>,
}

impl MockClient {
    fn record(&self, call: Call) {
        self.recorder.calls.lock().push(call);
    }
}

#[async_trait]
impl BucketClient for MockClient {
    async fn create_bucket(
        &self,
        name: &str,
        acl: &str,
        location: &str,
    ) -> Result<Option<String>, ProviderError> {
        self.record(Call::Create {
            name: name.to_owned(),
            acl: acl.to_owned(),
            location: location.to_owned(),
        });
        match &self.script.fail_create {
            Some(message) => Err(ProviderError::CreateBucket {
                message: message.clone(),
            }),
            None => Ok(self.script.location.clone()),
        }
    }

    async fn wait_until_exists(&self, name: &str) -> Result<(), ProviderError> {
        self.record(Call::Wait {
            name: name.to_owned(),
        });
        match &self.script.fail_wait {
            Some(message) => Err(ProviderError::WaitForBucket {
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    async fn put_bucket_acl(
        &self,
        bucket: &str,
        acl: &str,
        grants: Vec<Grant>,
    ) -> Result<(), ProviderError> {
        self.record(Call::PutAcl {
            bucket: bucket.to_owned(),
            acl: acl.to_owned(),
            grants: grants.len(),
        });
        *self.recorder.grants.lock() = grants;
        match &self.script.fail_acl {
            Some(message) => Err(ProviderError::PutBucketAcl {
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    async fn delete_bucket(&self, name: &str) -> Result<(), ProviderError> {
        self.record(Call::Delete {
            name: name.to_owned(),
        });
        match &self.script.fail_delete {
            Some(message) => Err(ProviderError::DeleteBucket {
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// Publisher that keeps every published message in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingPublisher {
    messages: Arc<Mutex<Vec<(String, Bytes)>>>,
    fail: bool,
}

impl RecordingPublisher {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn messages(&self) -> Vec<(String, Bytes)> {
        self.messages.lock().clone()
    }

    /// The single message published, decoded as JSON.
    pub fn only_json(&self) -> (String, serde_json::Value) {
        let messages = self.messages();
        assert_eq!(messages.len(), 1, "expected exactly one message: {messages:?}");
        let (subject, payload) = messages.into_iter().next().expect("one message");
        let value = serde_json::from_slice(&payload).expect("json payload");
        (subject, value)
    }
}

#[async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(&self, subject: String, payload: Bytes) -> Result<(), PublishError> {
        self.messages.lock().push((subject.clone(), payload));
        if self.fail {
            return Err(PublishError::Transport {
                subject,
                message: "connection closed".to_owned(),
            });
        }
        Ok(())
    }
}
