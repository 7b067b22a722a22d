use crate::dht::Chord;
use crate::dht::JoinMode;
use crate::dht::NodeStatus;
use crate::dht::Stabilization;
use crate::error::Result;
use crate::tests::default::assert_converged;
use crate::tests::default::fingers;
use crate::tests::default::gen_ring;
use crate::tests::default::gen_swarm;
use crate::tests::default::stabilize_rounds;

#[tokio::test]
async fn test_dynamic_founder_is_online() -> Result<()> {
    let swarm = gen_swarm(4, JoinMode::Dynamic);
    let peers = gen_ring(&swarm, &[9]).await;
    assert_eq!(peers[0].status()?, NodeStatus::Online);
    assert_eq!(fingers(&peers[0]), vec![Some(9), None, None, None]);
    assert_eq!(peers[0].predecessor()?, None);
    Ok(())
}

#[tokio::test]
async fn test_dynamic_join_only_sets_successor() -> Result<()> {
    let swarm = gen_swarm(4, JoinMode::Dynamic);
    let peers = gen_ring(&swarm, &[2, 7]).await;
    let newcomer = &peers[1];
    assert_eq!(newcomer.status()?, NodeStatus::Joining);
    assert_eq!(fingers(newcomer), vec![Some(2), None, None, None]);
    assert_eq!(newcomer.predecessor()?, None);

    // everything but stabilize is a no-op while joining
    newcomer.fix_fingers().await?;
    newcomer.check_successor().await?;
    assert_eq!(fingers(newcomer), vec![Some(2), None, None, None]);

    newcomer.stabilize().await?;
    assert_eq!(newcomer.status()?, NodeStatus::Online);
    assert_eq!(
        peers[0].predecessor()?.map(|p| p.index()),
        Some(7)
    );
    Ok(())
}

#[tokio::test]
async fn test_notify_adopts_closer_predecessor() -> Result<()> {
    let swarm = gen_swarm(4, JoinMode::Dynamic);
    let peers = gen_ring(&swarm, &[8]).await;
    let circle = swarm.network().circle().clone();
    let peer = &peers[0];

    peer.notify(circle.at(2)).await?;
    assert_eq!(peer.predecessor()?, Some(circle.at(2)));
    // 1 is not in (2, 8)
    peer.notify(circle.at(1)).await?;
    assert_eq!(peer.predecessor()?, Some(circle.at(2)));
    peer.notify(circle.at(5)).await?;
    assert_eq!(peer.predecessor()?, Some(circle.at(5)));
    Ok(())
}

#[tokio::test]
async fn test_dynamic_ring_converges() -> Result<()> {
    let swarm = gen_swarm(6, JoinMode::Dynamic);
    gen_ring(&swarm, &[5, 12, 20, 33, 40, 51, 60]).await;
    stabilize_rounds(&swarm, 30).await;
    assert_converged(&swarm);
    Ok(())
}

#[tokio::test]
async fn test_dynamic_ownership_is_unique() -> Result<()> {
    let swarm = gen_swarm(5, JoinMode::Dynamic);
    gen_ring(&swarm, &[3, 9, 17, 22, 30]).await;
    stabilize_rounds(&swarm, 30).await;

    let circle = swarm.network().circle().clone();
    let peers = swarm.peers();
    for x in circle.iter() {
        let owners: Vec<_> = peers
            .iter()
            .filter(|p| {
                let pred = p.predecessor().unwrap().unwrap();
                crate::dht::CircularInterval::left_open(pred, p.id()).contains(x)
            })
            .map(|p| p.id())
            .collect();
        assert_eq!(owners.len(), 1, "owners of {}", x);
        for peer in peers.iter() {
            assert_eq!(peer.find_successor(*x).await?, Some(owners[0]));
        }
    }
    Ok(())
}

#[tokio::test]
async fn test_peers_joining_through_different_members() -> Result<()> {
    let swarm = gen_swarm(6, JoinMode::Dynamic);
    gen_ring(&swarm, &[30]).await;
    let mut via = swarm.peer(30).unwrap().id();
    for index in [3, 50, 17, 41, 9] {
        stabilize_rounds(&swarm, 3).await;
        let peer = swarm.create_peer(index)?;
        peer.join(Some(via)).await?;
        via = peer.id();
        stabilize_rounds(&swarm, 1).await;
    }
    stabilize_rounds(&swarm, 30).await;
    assert_converged(&swarm);
    Ok(())
}
