//! Thread partition: connected components of the message subgraph formed
//! by reply edges and strong inferred edges.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use hilo_config::GraphConfig;
use hilo_core::entities::{MessageNode, MessageRef, Thread, ThreadEntry, ThreadsDocument, ThreadsMetadata};
use hilo_core::enums::EdgeKind;
use hilo_core::ids::{NodeId, thread_id};
use rustworkx_core::connectivity::connected_components;
use rustworkx_core::petgraph::graph::{NodeIndex, UnGraph};

use crate::graph::KnowledgeGraph;

/// Threads plus the messages that ended up in no thread.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadPartition {
    threads: Vec<Thread>,
    orphans: Vec<i64>,
    min_thread_size: usize,
}

/// Strongest link between two messages across parallel edges.
#[derive(Debug, Clone, Copy, Default)]
struct Link {
    reply: bool,
    inferred: f64,
}

impl ThreadPartition {
    /// Partition the messages of `graph`. Parallel inferred edges between the
    /// same pair combine by maximum weight, and only pairs above
    /// `partition_threshold` (or joined by a reply) stay connected.
    #[must_use]
    pub fn from_graph(graph: &KnowledgeGraph, config: &GraphConfig) -> Self {
        let mut subgraph: UnGraph<i64, f64> = UnGraph::default();
        let mut index: HashMap<i64, NodeIndex> = HashMap::new();
        for &id in graph.message_ids() {
            index.insert(id, subgraph.add_node(id));
        }

        let mut links: BTreeMap<(i64, i64), Link> = BTreeMap::new();
        for (source, target, data) in graph.edges() {
            let (NodeId::Message(a), NodeId::Message(b)) = (source, target) else {
                continue;
            };
            if a == b {
                continue;
            }
            let link = links.entry((a.min(b), a.max(b))).or_default();
            if data.kind == EdgeKind::ReplyTo {
                link.reply = true;
            } else if data.kind.is_inferred() {
                link.inferred = link.inferred.max(data.weight);
            }
        }
        for ((a, b), link) in links {
            if !(link.reply || link.inferred > config.partition_threshold) {
                continue;
            }
            if let (Some(&x), Some(&y)) = (index.get(&a), index.get(&b)) {
                let weight = if link.reply { 1.0 } else { link.inferred };
                subgraph.add_edge(x, y, weight);
            }
        }

        let mut threads = Vec::new();
        let mut orphans = Vec::new();
        for component in connected_components(&subgraph) {
            let mut members: Vec<&MessageNode> = component
                .iter()
                .filter_map(|&i| graph.message(subgraph[i]))
                .collect();
            members.sort_by_key(|m| (m.timestamp, m.message_id));
            if members.len() < config.min_thread_size {
                orphans.extend(members.iter().map(|m| m.message_id));
                continue;
            }
            let (Some(first), Some(last)) = (members.first(), members.last()) else {
                continue;
            };
            threads.push(Thread {
                thread_id: thread_id(first.message_id),
                root_message_id: first.message_id,
                ordered_message_ids: members.iter().map(|m| m.message_id).collect(),
                participants: members.iter().map(|m| m.sender_id).collect::<BTreeSet<_>>(),
                start_ts: first.timestamp,
                end_ts: last.timestamp,
            });
        }

        threads.sort_by_key(|t| (t.start_ts, t.root_message_id));
        let rank: HashMap<i64, usize> = graph
            .message_ids()
            .iter()
            .enumerate()
            .map(|(i, &id)| (id, i))
            .collect();
        orphans.sort_by_key(|id| rank.get(id).copied().unwrap_or(usize::MAX));

        tracing::debug!(
            chat_id = graph.chat_id(),
            threads = threads.len(),
            orphans = orphans.len(),
            "thread partition computed"
        );
        Self {
            threads,
            orphans,
            min_thread_size: config.min_thread_size,
        }
    }

    /// Threads ordered by start time, ties by root id.
    #[must_use]
    pub fn threads(&self) -> &[Thread] {
        &self.threads
    }

    /// Messages outside every thread, chronological.
    #[must_use]
    pub fn orphans(&self) -> &[i64] {
        &self.orphans
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.threads.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    #[must_use]
    pub fn thread_of(&self, message_id: i64) -> Option<&Thread> {
        self.threads.iter().find(|t| t.contains(message_id))
    }

    /// Serializable `{ metadata, threads, orphans }` form.
    #[must_use]
    pub fn to_document(&self, graph: &KnowledgeGraph) -> ThreadsDocument {
        let threads = self
            .threads
            .iter()
            .map(|t| {
                let messages = t
                    .ordered_message_ids
                    .iter()
                    .filter_map(|&id| graph.message(id))
                    .map(|m| MessageRef {
                        id: m.message_id,
                        sender_id: m.sender_id,
                        timestamp: m.timestamp,
                        intention: m.intention,
                        text: m.text.clone(),
                    })
                    .collect();
                (
                    t.thread_id.clone(),
                    ThreadEntry {
                        root_message_id: t.root_message_id,
                        messages,
                        participants: t.participants.iter().copied().collect(),
                        start_ts: t.start_ts,
                        end_ts: t.end_ts,
                    },
                )
            })
            .collect();
        ThreadsDocument {
            metadata: ThreadsMetadata {
                chat_id: graph.chat_id(),
                chat_name: graph.chat_name().to_string(),
                total_threads: self.threads.len(),
                total_messages: graph.message_ids().len(),
                orphan_count: self.orphans.len(),
                min_thread_size: self.min_thread_size,
            },
            threads,
            orphans: self.orphans.clone(),
        }
    }
}
