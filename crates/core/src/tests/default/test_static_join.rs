use crate::dht::Chord;
use crate::dht::JoinMode;
use crate::dht::NodeStatus;
use crate::error::Error;
use crate::error::Result;
use crate::tests::default::finger_indices;
use crate::tests::default::gen_ring;
use crate::tests::default::gen_swarm;

#[tokio::test]
async fn test_static_founder_points_to_itself() -> Result<()> {
    let swarm = gen_swarm(3, JoinMode::Static);
    let peers = gen_ring(&swarm, &[4]).await;
    let founder = &peers[0];
    assert_eq!(founder.status()?, NodeStatus::Online);
    assert_eq!(finger_indices(founder), vec![4, 4, 4]);
    assert_eq!(founder.predecessor()?, Some(founder.id()));
    assert_eq!(founder.find_successor(swarm.network().circle().at(1)).await?, Some(founder.id()));
    Ok(())
}

#[tokio::test]
async fn test_static_join_three_peers() -> Result<()> {
    let swarm = gen_swarm(3, JoinMode::Static);
    gen_ring(&swarm, &[0, 1, 3]).await;

    let p0 = swarm.peer(0).unwrap();
    let p1 = swarm.peer(1).unwrap();
    let p3 = swarm.peer(3).unwrap();
    assert_eq!(finger_indices(&p0), vec![1, 3, 0]);
    assert_eq!(finger_indices(&p1), vec![3, 3, 0]);
    assert_eq!(finger_indices(&p3), vec![0, 0, 0]);

    assert_eq!(p0.predecessor()?.map(|p| p.index()), Some(3));
    assert_eq!(p1.predecessor()?.map(|p| p.index()), Some(0));
    assert_eq!(p3.predecessor()?.map(|p| p.index()), Some(1));
    for peer in swarm.peers() {
        assert_eq!(peer.status()?, NodeStatus::Online);
    }
    Ok(())
}

#[tokio::test]
async fn test_static_join_fourth_peer_updates_others() -> Result<()> {
    let swarm = gen_swarm(3, JoinMode::Static);
    gen_ring(&swarm, &[0, 1, 3]).await;

    let p6 = swarm.create_peer(6)?;
    let via = swarm.peer(3).unwrap().id();
    p6.join(Some(via)).await?;

    assert_eq!(finger_indices(&p6), vec![0, 0, 3]);
    assert_eq!(finger_indices(&swarm.peer(3).unwrap()), vec![6, 6, 0]);
    assert_eq!(finger_indices(&swarm.peer(1).unwrap()), vec![3, 3, 6]);
    assert_eq!(finger_indices(&swarm.peer(0).unwrap()), vec![1, 3, 6]);

    assert_eq!(p6.predecessor()?.map(|p| p.index()), Some(3));
    assert_eq!(
        swarm.peer(0).unwrap().predecessor()?.map(|p| p.index()),
        Some(6)
    );
    Ok(())
}

#[tokio::test]
async fn test_static_routing_from_every_peer() -> Result<()> {
    let swarm = gen_swarm(3, JoinMode::Static);
    gen_ring(&swarm, &[0, 1, 3, 6]).await;
    let circle = swarm.network().circle().clone();
    let expect = [0, 1, 3, 3, 6, 6, 6, 0];
    for peer in swarm.peers() {
        for (x, owner) in expect.iter().enumerate() {
            let found = peer.find_successor(circle.at(x as i64)).await?;
            assert_eq!(found.map(|f| f.index()), Some(*owner), "{} from {}", x, peer.id());
        }
    }
    Ok(())
}

#[tokio::test]
async fn test_join_twice_is_rejected() -> Result<()> {
    let swarm = gen_swarm(3, JoinMode::Static);
    let peers = gen_ring(&swarm, &[0, 5]).await;
    let res = peers[1].join(Some(peers[0].id())).await;
    assert!(matches!(res, Err(Error::PeerAlreadyJoined(5))));
    assert_eq!(peers[1].status()?, NodeStatus::Online);
    Ok(())
}

#[tokio::test]
async fn test_join_via_offline_peer_fails() -> Result<()> {
    let swarm = gen_swarm(3, JoinMode::Static);
    let lonely = swarm.create_peer(2)?;
    let newcomer = swarm.create_peer(6)?;
    let res = newcomer.join(Some(lonely.id())).await;
    assert!(matches!(res, Err(Error::JoinFailed(2, _))));
    assert_eq!(newcomer.status()?, NodeStatus::Offline);
    assert!(newcomer.finger_list()?.iter().all(|f| f.is_none()));
    assert_eq!(newcomer.predecessor()?, None);

    // the failed peer can still found a ring of its own
    newcomer.join(None).await?;
    assert_eq!(newcomer.status()?, NodeStatus::Online);
    Ok(())
}
