use std::sync::Arc;

use crate::dht::Chord;
use crate::dht::ChordPeer;
use crate::dht::JoinMode;
use crate::dht::NodeStatus;
use crate::dht::Stabilization;
use crate::swarm::Swarm;
use crate::swarm::SwarmBuilder;

mod test_dynamic_join;
mod test_message_handler;
mod test_stabilization;
mod test_static_join;

pub fn gen_swarm(bits: u32, mode: JoinMode) -> Swarm {
    SwarmBuilder::new(bits, mode).build().unwrap()
}

/// The first index founds the ring, every other peer joins through it.
pub async fn gen_ring(swarm: &Swarm, indices: &[u64]) -> Vec<Arc<ChordPeer>> {
    let mut peers = vec![];
    let mut via = None;
    for index in indices {
        let peer = swarm.create_peer(*index).unwrap();
        peer.join(via).await.unwrap();
        via = via.or(Some(peer.id()));
        peers.push(peer);
    }
    peers
}

/// Run every maintenance operation on every peer, in index order.
pub async fn stabilize_rounds(swarm: &Swarm, rounds: usize) {
    for _ in 0..rounds {
        for peer in swarm.peers() {
            peer.stabilize()
                .await
                .unwrap_or_else(|e| tracing::debug!("stabilize: {:?}", e));
            peer.check_predecessor()
                .await
                .unwrap_or_else(|e| tracing::debug!("check_predecessor: {:?}", e));
            peer.check_successor()
                .await
                .unwrap_or_else(|e| tracing::debug!("check_successor: {:?}", e));
            if peer.status().unwrap() == NodeStatus::Online {
                peer.fix_all_fingers()
                    .await
                    .unwrap_or_else(|e| tracing::debug!("fix_all_fingers: {:?}", e));
            }
        }
    }
}

pub fn fingers(peer: &ChordPeer) -> Vec<Option<u64>> {
    peer.finger_list()
        .unwrap()
        .into_iter()
        .map(|f| f.map(|n| n.index()))
        .collect()
}

pub fn finger_indices(peer: &ChordPeer) -> Vec<u64> {
    fingers(peer)
        .into_iter()
        .map(|f| f.expect("finger should be populated"))
        .collect()
}

pub fn online_indices(swarm: &Swarm) -> Vec<u64> {
    swarm
        .peers_in(NodeStatus::Online)
        .iter()
        .map(|p| p.id().index())
        .collect()
}

/// First member at or after `x` walking clockwise.
pub fn expected_owner(members: &[u64], x: u64) -> u64 {
    let mut sorted = members.to_vec();
    sorted.sort();
    sorted
        .iter()
        .find(|m| **m >= x)
        .copied()
        .unwrap_or(sorted[0])
}

/// Every online peer links to its ring neighbours, and every finger points
/// to the owner of its start.
pub fn assert_converged(swarm: &Swarm) {
    let members = online_indices(swarm);
    let n = members.len();
    for (i, index) in members.iter().enumerate() {
        let peer = swarm.peer(*index).unwrap();
        let next = members[(i + 1) % n];
        let prev = members[(i + n - 1) % n];
        assert_eq!(
            peer.successor().unwrap().map(|s| s.index()),
            Some(next),
            "successor of {index}"
        );
        assert_eq!(
            peer.predecessor().unwrap().map(|p| p.index()),
            Some(prev),
            "predecessor of {index}"
        );
        let finger = peer.lock_finger().unwrap().clone();
        for k in 1..=finger.size() {
            let start = finger.start(k).unwrap();
            assert_eq!(
                finger.node(k).unwrap().map(|f| f.index()),
                Some(expected_owner(&members, start)),
                "finger {k} of {index}"
            );
        }
    }
}
