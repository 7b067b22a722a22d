//! Chord algorithm implement.
#![warn(missing_docs)]
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use async_recursion::async_recursion;
use async_trait::async_trait;
use rand::Rng;

use super::interval::CircularInterval;
use super::network::ChordNetwork;
use super::types::Chord;
use super::types::ChordStorage;
use super::types::NodeStatus;
use super::types::Stabilization;
use super::FingerTable;
use super::Identifier;
use crate::error::Error;
use crate::error::Result;
use crate::message::RemotePeer;
use crate::message::Transport;
use crate::storage::KvStorageInterface;
use crate::storage::MemStorage;

/// A single member of the ring.
///
/// A peer only ever touches its own state. Everything it knows about other
/// peers is an [Identifier], and every question to them is a message sent
/// through the shared [Transport].
/// ChordPeer implemented [Chord], [Stabilization] and [ChordStorage].
pub struct ChordPeer {
    id: Identifier,
    network: Arc<ChordNetwork>,
    transport: Arc<dyn Transport>,
    /// [FingerTable] help peer to find successor quickly.
    finger: Mutex<FingerTable>,
    /// The identifier of previous peer on the ring, `None` while unknown.
    predecessor: Mutex<Option<Identifier>>,
    status: Mutex<NodeStatus>,
    storage: MemStorage<String>,
}

impl ChordPeer {
    /// Create an OFFLINE peer at `id`.
    pub fn new(id: Identifier, network: Arc<ChordNetwork>, transport: Arc<dyn Transport>) -> Self {
        let finger = FingerTable::new(id, network.bits());
        Self {
            id,
            network,
            transport,
            finger: Mutex::new(finger),
            predecessor: Mutex::new(None),
            status: Mutex::new(NodeStatus::Offline),
            storage: MemStorage::new(),
        }
    }

    /// Identifier of this peer.
    pub fn id(&self) -> Identifier {
        self.id
    }

    /// Shared ring configuration.
    pub fn network(&self) -> &Arc<ChordNetwork> {
        &self.network
    }

    /// Local storage.
    pub fn storage(&self) -> &MemStorage<String> {
        &self.storage
    }

    /// Lock and return MutexGuard of finger table.
    pub fn lock_finger(&self) -> Result<MutexGuard<FingerTable>> {
        self.finger.lock().map_err(|_| Error::DHTSyncLockError)
    }

    /// Lock and return MutexGuard of predecessor.
    pub fn lock_predecessor(&self) -> Result<MutexGuard<Option<Identifier>>> {
        self.predecessor.lock().map_err(|_| Error::DHTSyncLockError)
    }

    fn lock_status(&self) -> Result<MutexGuard<NodeStatus>> {
        self.status.lock().map_err(|_| Error::DHTSyncLockError)
    }

    /// Current lifecycle status.
    pub fn status(&self) -> Result<NodeStatus> {
        Ok(*self.lock_status()?)
    }

    fn set_status(&self, status: NodeStatus) -> Result<()> {
        let mut current = self.lock_status()?;
        if *current != status {
            tracing::info!("peer {} {} -> {}", self.id, *current, status);
            *current = status;
        }
        Ok(())
    }

    /// First finger.
    pub fn successor(&self) -> Result<Option<Identifier>> {
        Ok(self.lock_finger()?.successor())
    }

    /// Predecessor link.
    pub fn predecessor(&self) -> Result<Option<Identifier>> {
        Ok(*self.lock_predecessor()?)
    }

    /// Overwrite the predecessor link.
    pub fn set_predecessor(&self, node: Option<Identifier>) -> Result<()> {
        tracing::debug!("peer {} set predecessor {:?}", self.id, node);
        *self.lock_predecessor()? = node;
        Ok(())
    }

    /// Snapshot of every finger.
    pub fn finger_list(&self) -> Result<Vec<Option<Identifier>>> {
        Ok(self.lock_finger()?.list().clone())
    }

    fn set_finger(&self, k: usize, node: Identifier) -> Result<()> {
        self.lock_finger()?.set_node(k, node)
    }

    fn remote(&self, to: Identifier) -> RemotePeer {
        RemotePeer::new(self.id, to, self.transport.clone())
    }

    async fn successor_of(&self, node: Identifier) -> Result<Option<Identifier>> {
        if node == self.id {
            return self.successor();
        }
        self.remote(node).successor().await
    }

    async fn predecessor_of(&self, node: Identifier) -> Result<Option<Identifier>> {
        if node == self.id {
            return self.predecessor();
        }
        self.remote(node).predecessor().await
    }

    async fn closest_preceding_finger_of(
        &self,
        node: Identifier,
        id: Identifier,
    ) -> Result<Option<Identifier>> {
        if node == self.id {
            return self.closest_preceding_finger(id).await;
        }
        self.remote(node).closest_preceding_finger(id).await
    }

    async fn notify_of(&self, node: Identifier) -> Result<()> {
        if node == self.id {
            return self.notify(self.id).await;
        }
        self.remote(node).notify(self.id).await
    }

    #[async_recursion]
    async fn update_finger_table_of(
        &self,
        target: Identifier,
        node: Identifier,
        index: usize,
        hops: usize,
    ) -> Result<()> {
        if target == self.id {
            return self.update_finger_table(node, index, hops).await;
        }
        self.remote(target)
            .update_finger_table(node, index, hops)
            .await
    }

    /// Status of another peer. Any failure to reach it counts as OFFLINE.
    pub async fn status_of(&self, node: Identifier) -> NodeStatus {
        if node == self.id {
            return self.status().unwrap_or(NodeStatus::Offline);
        }
        match self.remote(node).status().await {
            Ok(status) => status,
            Err(e) => {
                tracing::debug!("peer {} status probe of {} failed: {:?}", self.id, node, e);
                NodeStatus::Offline
            }
        }
    }

    /// Refresh finger `k` with the successor of its start.
    pub async fn fix_finger(&self, k: usize) -> Result<()> {
        let start = self.lock_finger()?.start(k)?;
        let start = self.network.circle().get(start)?;
        if let Some(node) = self.find_successor(start).await? {
            self.set_finger(k, node)?;
        }
        Ok(())
    }

    /// Refresh every finger but the successor.
    pub async fn fix_all_fingers(&self) -> Result<()> {
        for k in 2..=self.network.bits() as usize {
            self.fix_finger(k).await?;
        }
        Ok(())
    }

    /// Every local entry.
    pub async fn dump(&self) -> Result<Vec<(String, String)>> {
        self.storage.get_all().await
    }

    /// Whether a key falls in `(predecessor, self]`. With no predecessor,
    /// or being our own predecessor, we own every key.
    fn owns(&self, key: Identifier) -> Result<bool> {
        Ok(match self.predecessor()? {
            None => true,
            Some(pred) if pred == self.id => true,
            Some(pred) => CircularInterval::left_open(pred, self.id).contains(&key),
        })
    }

    /// The peer responsible for `key`, decided locally when possible.
    /// An OFFLINE peer knows no owner.
    pub async fn owner_of(&self, key: &str) -> Result<Option<Identifier>> {
        if self.status()? == NodeStatus::Offline {
            return Ok(None);
        }
        let id = self.network.key_identifier(key);
        if self.owns(id)? {
            return Ok(Some(self.id));
        }
        self.find_successor(id).await
    }

    /// Same as [ChordPeer::owner_of] but only answered by an ONLINE peer.
    pub async fn lookup_node_for_item(&self, key: &str) -> Result<Option<Identifier>> {
        if self.status()? != NodeStatus::Online {
            return Ok(None);
        }
        self.owner_of(key).await
    }

    async fn routed_owner(&self, origin: Option<Identifier>, key: &str) -> Result<Identifier> {
        let owner = self.lookup_node_for_item(key).await?;
        tracing::debug!(
            "key {} from {:?} via {} owned by {:?}",
            key,
            origin,
            self.id,
            owner
        );
        owner.ok_or_else(|| Error::NoOwner(key.to_string()))
    }

    /// Static join, builds everything at once.
    async fn join_and_update(&self, via: Option<Identifier>) -> Result<()> {
        match via {
            Some(np) => {
                self.init_finger_table(np).await?;
                self.update_others().await?;
                self.redistribute_keys().await
            }
            None => {
                self.lock_finger()?.fill(self.id);
                self.set_predecessor(Some(self.id))
            }
        }
    }

    /// Dynamic join, only learns the successor.
    async fn join_only(&self, via: Option<Identifier>) -> Result<()> {
        self.set_predecessor(None)?;
        match via {
            Some(np) => {
                let succ = self
                    .remote(np)
                    .find_successor(self.id)
                    .await?
                    .ok_or(Error::PeerOffline(np.index()))?;
                self.set_finger(1, succ)
            }
            None => self.set_finger(1, self.id),
        }
    }

    async fn init_finger_table(&self, np: Identifier) -> Result<()> {
        let circle = self.network.circle();
        let remote = self.remote(np);

        let start = circle.get(self.lock_finger()?.start(1)?)?;
        let succ = remote
            .find_successor(start)
            .await?
            .ok_or(Error::PeerOffline(np.index()))?;
        self.set_finger(1, succ)?;

        let pred = self.predecessor_of(succ).await?;
        self.set_predecessor(pred)?;
        self.remote(succ).set_predecessor(Some(self.id)).await?;

        for i in 1..self.network.bits() as usize {
            let (start, prev) = {
                let finger = self.lock_finger()?;
                (finger.start(i + 1)?, finger.node(i)?)
            };
            let start = circle.get(start)?;
            let node = match prev {
                Some(prev) if CircularInterval::right_open(self.id, prev).contains(&start) => prev,
                _ => remote
                    .find_successor(start)
                    .await?
                    .ok_or(Error::PeerOffline(np.index()))?,
            };
            self.set_finger(i + 1, node)?;
        }
        Ok(())
    }

    async fn update_others(&self) -> Result<()> {
        let circle = self.network.circle();
        for i in 1..=self.network.bits() as usize {
            let id = circle.at(self.id.index() as i64 - (1i64 << (i - 1)));
            let mut p = self
                .find_predecessor(id)
                .await?
                .ok_or(Error::RoutingAborted(id.index()))?;
            if self.successor_of(p).await? == Some(id) {
                p = id;
            }
            self.update_finger_table_of(p, self.id, i, 0).await?;
        }
        Ok(())
    }

    /// Copy keys held by the successor that now belong to us.
    async fn redistribute_keys(&self) -> Result<()> {
        let succ = match self.successor()? {
            Some(succ) if succ != self.id => succ,
            _ => return Ok(()),
        };
        let mut moved = 0;
        for (key, value) in self.remote(succ).dump().await? {
            if self.owner_of(&key).await? == Some(self.id) {
                self.storage.put(&key, &value).await?;
                moved += 1;
            }
        }
        if moved > 0 {
            tracing::info!("peer {} took over {} keys from {}", self.id, moved, succ);
        }
        Ok(())
    }

    /// Find a replacement for a missing or offline successor.
    async fn recover_successor(&self) -> Result<()> {
        let probe = self.network.circle().next(self.id);
        let pred = self.predecessor()?;
        if let Some(p) = pred.filter(|p| *p != self.id) {
            if self.status_of(p).await == NodeStatus::Online {
                if let Some(s) = self.live_answer(p, probe).await {
                    return self.set_finger(1, s);
                }
            }
        }
        let fingers = self.finger_list()?;
        for f in fingers.into_iter().skip(1).flatten() {
            if f == self.id || self.status_of(f).await != NodeStatus::Online {
                continue;
            }
            let s = self.live_answer(f, probe).await.unwrap_or(f);
            return self.set_finger(1, s);
        }
        tracing::warn!("peer {} found no live successor, falling back to self", self.id);
        self.set_finger(1, self.id)
    }

    /// Ask `candidate` for the successor of `probe`, keeping the answer only
    /// when it names another ONLINE peer.
    async fn live_answer(&self, candidate: Identifier, probe: Identifier) -> Option<Identifier> {
        match self.remote(candidate).find_successor(probe).await {
            Ok(Some(s)) if s != self.id && self.status_of(s).await == NodeStatus::Online => Some(s),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(
                    "peer {} failed to ask {} for a successor: {:?}",
                    self.id,
                    candidate,
                    e
                );
                None
            }
        }
    }

    fn reset(&self) -> Result<()> {
        *self.lock_finger()? = FingerTable::new(self.id, self.network.bits());
        self.set_predecessor(None)
    }
}

#[async_trait]
impl Chord for ChordPeer {
    async fn find_successor(&self, id: Identifier) -> Result<Option<Identifier>> {
        match self.find_predecessor(id).await? {
            Some(pred) => self.successor_of(pred).await,
            None => Ok(None),
        }
    }

    /// Iterates towards `id` hop by hop from this peer. The loop asks each
    /// hop for its successor and closest preceding finger, so it is bounded
    /// by the network's hop limit rather than by remote recursion.
    async fn find_predecessor(&self, id: Identifier) -> Result<Option<Identifier>> {
        if self.status()? == NodeStatus::Offline {
            return Ok(None);
        }
        let mut current = self.id;
        for hop in 0..self.network.max_hops() {
            let Some(succ) = self.successor_of(current).await? else {
                tracing::debug!("find_predecessor {}: {} has no answer", id, current);
                return Ok(None);
            };
            if CircularInterval::left_open(current, succ).contains(&id) {
                return Ok(Some(current));
            }
            let Some(next) = self.closest_preceding_finger_of(current, id).await? else {
                tracing::debug!("find_predecessor {}: {} has no answer", id, current);
                return Ok(None);
            };
            if next == current {
                tracing::warn!("find_predecessor {}: stalled at {}", id, current);
                return Err(Error::RoutingStalled(id.index(), current.index()));
            }
            tracing::debug!("find_predecessor {}: hop {} {} -> {}", id, hop, current, next);
            current = next;
        }
        Err(Error::RoutingHopLimit(id.index(), self.network.max_hops()))
    }

    async fn closest_preceding_finger(&self, id: Identifier) -> Result<Option<Identifier>> {
        if self.status()? == NodeStatus::Offline {
            return Ok(None);
        }
        Ok(Some(self.lock_finger()?.closest_preceding(id)))
    }

    async fn join(&self, via: Option<Identifier>) -> Result<()> {
        {
            let mut status = self.lock_status()?;
            if *status != NodeStatus::Offline {
                return Err(Error::PeerAlreadyJoined(self.id.index()));
            }
            *status = NodeStatus::Joining;
        }
        tracing::info!("peer {} joining via {:?}", self.id, via);

        let res = if self.network.is_dynamic() {
            self.join_only(via).await
        } else {
            self.join_and_update(via).await
        };

        match res {
            Ok(()) => {
                // a dynamic peer goes online on its first stabilize, unless it founds the ring
                if !self.network.is_dynamic() || via.is_none() {
                    self.set_status(NodeStatus::Online)?;
                }
                Ok(())
            }
            Err(e) => {
                tracing::error!("peer {} failed to join via {:?}: {}", self.id, via, e);
                self.reset()?;
                self.set_status(NodeStatus::Offline)?;
                Err(Error::JoinFailed(
                    via.map(|v| v.index()).unwrap_or(self.id.index()),
                    e.to_string(),
                ))
            }
        }
    }

    async fn leave(&self) -> Result<()> {
        self.set_status(NodeStatus::Offline)
    }

    async fn notify(&self, node: Identifier) -> Result<()> {
        if self.status()? != NodeStatus::Online {
            return Ok(());
        }
        let mut predecessor = self.lock_predecessor()?;
        let adopt = match *predecessor {
            None => true,
            Some(pred) => CircularInterval::open(pred, self.id).contains(&node),
        };
        if adopt {
            tracing::debug!("peer {} notified, predecessor {}", self.id, node);
            *predecessor = Some(node);
        }
        Ok(())
    }

    async fn update_finger_table(&self, node: Identifier, index: usize, hops: usize) -> Result<()> {
        if hops >= self.network.max_hops() {
            tracing::warn!(
                "peer {} stops finger {} propagation of {} after {} hops",
                self.id,
                index,
                node,
                hops
            );
            return Ok(());
        }
        let updated = {
            let mut finger = self.lock_finger()?;
            match finger.node(index)? {
                Some(current) if CircularInterval::left_open(self.id, current).contains(&node) => {
                    finger.set_node(index, node)?;
                    true
                }
                _ => false,
            }
        };
        if !updated {
            return Ok(());
        }
        match self.predecessor()? {
            Some(pred) => {
                self.update_finger_table_of(pred, node, index, hops + 1)
                    .await
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Stabilization for ChordPeer {
    async fn stabilize(&self) -> Result<()> {
        let status = self.status()?;
        if status == NodeStatus::Offline {
            return Ok(());
        }
        let Some(mut succ) = self.successor()? else {
            return Ok(());
        };
        if let Some(x) = self.predecessor_of(succ).await? {
            if CircularInterval::open(self.id, succ).contains(&x) {
                tracing::debug!("peer {} stabilize successor {} -> {}", self.id, succ, x);
                self.set_finger(1, x)?;
                succ = x;
            }
        }
        if status == NodeStatus::Joining {
            self.set_status(NodeStatus::Online)?;
        }
        self.notify_of(succ).await
    }

    async fn fix_fingers(&self) -> Result<()> {
        let m = self.network.bits() as usize;
        if m <= 1 || self.status()? != NodeStatus::Online {
            return Ok(());
        }
        let k = rand::thread_rng().gen_range(2..=m);
        self.fix_finger(k).await
    }

    async fn check_predecessor(&self) -> Result<()> {
        if self.status()? != NodeStatus::Online {
            return Ok(());
        }
        let pred = match self.predecessor()? {
            Some(pred) if pred != self.id => pred,
            _ => return Ok(()),
        };
        if self.status_of(pred).await == NodeStatus::Offline {
            tracing::info!("peer {} drops offline predecessor {}", self.id, pred);
            self.set_predecessor(None)?;
        }
        Ok(())
    }

    async fn check_successor(&self) -> Result<()> {
        if self.status()? != NodeStatus::Online {
            return Ok(());
        }
        let mut dead = BTreeSet::new();
        for node in self.finger_list()?.into_iter().flatten() {
            if node != self.id
                && !dead.contains(&node)
                && self.status_of(node).await == NodeStatus::Offline
            {
                dead.insert(node);
            }
        }
        let succ = self.successor()?;
        {
            let mut finger = self.lock_finger()?;
            for node in dead.iter() {
                finger.remove(*node);
            }
        }
        match succ {
            Some(succ) if !dead.contains(&succ) => Ok(()),
            _ => {
                tracing::info!("peer {} lost successor {:?}", self.id, succ);
                self.recover_successor().await
            }
        }
    }
}

#[async_trait]
impl ChordStorage for ChordPeer {
    async fn store(&self, origin: Option<Identifier>, key: &str, value: &str) -> Result<()> {
        let owner = self.routed_owner(origin, key).await?;
        if owner == self.id {
            return self.storage.put(key, &value.to_string()).await;
        }
        self.remote(owner).store_local(key, value).await
    }

    async fn lookup(&self, origin: Option<Identifier>, key: &str) -> Result<Option<String>> {
        if self.status()? != NodeStatus::Online {
            return Ok(None);
        }
        let owner = self.routed_owner(origin, key).await?;
        if owner == self.id {
            return self.storage.get(key).await;
        }
        self.remote(owner).lookup_local(key).await
    }

    async fn delete(&self, origin: Option<Identifier>, key: &str) -> Result<Option<String>> {
        if self.status()? != NodeStatus::Online {
            return Ok(None);
        }
        let owner = self.routed_owner(origin, key).await?;
        if owner == self.id {
            return self.storage.remove(key).await;
        }
        self.remote(owner).delete_local(key).await
    }

    async fn keys(&self) -> Result<BTreeSet<String>> {
        Ok(self.storage.keys().await?.into_iter().collect())
    }
}
