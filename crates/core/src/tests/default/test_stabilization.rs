use std::sync::Arc;
use std::time::Duration;

use crate::dht::Chord;
use crate::dht::JoinMode;
use crate::dht::NodeStatus;
use crate::dht::Stabilization;
use crate::dht::Stabilizer;
use crate::error::Result;
use crate::tests::default::assert_converged;
use crate::tests::default::gen_ring;
use crate::tests::default::gen_swarm;
use crate::tests::default::online_indices;
use crate::tests::default::stabilize_rounds;

#[tokio::test]
async fn test_converged_ring_is_stable() -> Result<()> {
    let swarm = gen_swarm(6, JoinMode::Dynamic);
    gen_ring(&swarm, &[1, 14, 22, 37, 48, 59]).await;
    stabilize_rounds(&swarm, 30).await;
    assert_converged(&swarm);

    let before = swarm.inspect().await.peers;
    for _ in 0..5 {
        for peer in swarm.peers() {
            peer.stabilize().await?;
            peer.fix_fingers().await?;
            peer.check_predecessor().await?;
            peer.check_successor().await?;
        }
    }
    let after = swarm.inspect().await.peers;
    assert_eq!(before, after);
    Ok(())
}

#[tokio::test]
async fn test_check_predecessor_drops_offline() -> Result<()> {
    let swarm = gen_swarm(4, JoinMode::Dynamic);
    gen_ring(&swarm, &[2, 9]).await;
    stabilize_rounds(&swarm, 5).await;

    let p9 = swarm.peer(9).unwrap();
    assert_eq!(p9.predecessor()?.map(|p| p.index()), Some(2));

    swarm.remove(2).await?;
    p9.check_predecessor().await?;
    assert_eq!(p9.predecessor()?, None);
    Ok(())
}

#[tokio::test]
async fn test_check_successor_recovers() -> Result<()> {
    let swarm = gen_swarm(4, JoinMode::Dynamic);
    gen_ring(&swarm, &[1, 5, 9, 13]).await;
    stabilize_rounds(&swarm, 20).await;
    assert_converged(&swarm);

    swarm.remove(9).await?;
    let p5 = swarm.peer(5).unwrap();
    p5.check_successor().await?;
    assert_eq!(p5.successor()?.map(|s| s.index()), Some(13));
    assert!(p5.finger_list()?.iter().all(|f| f.map(|n| n.index()) != Some(9)));
    Ok(())
}

#[tokio::test]
async fn test_lonely_peer_falls_back_to_itself() -> Result<()> {
    let swarm = gen_swarm(3, JoinMode::Dynamic);
    gen_ring(&swarm, &[1, 4]).await;
    stabilize_rounds(&swarm, 10).await;

    swarm.remove(4).await?;
    let p1 = swarm.peer(1).unwrap();
    p1.check_predecessor().await?;
    p1.check_successor().await?;
    assert_eq!(p1.successor()?, Some(p1.id()));
    assert_eq!(p1.predecessor()?, None);

    stabilize_rounds(&swarm, 2).await;
    assert_converged(&swarm);
    Ok(())
}

#[tokio::test]
async fn test_ring_heals_after_failure() -> Result<()> {
    let swarm = gen_swarm(6, JoinMode::Dynamic);
    gen_ring(&swarm, &[5, 12, 20, 33, 40, 51, 60]).await;
    stabilize_rounds(&swarm, 30).await;
    assert_converged(&swarm);

    swarm.remove(33).await?;
    swarm.remove(51).await?;
    stabilize_rounds(&swarm, 30).await;

    assert_eq!(online_indices(&swarm), vec![5, 12, 20, 40, 60]);
    assert_converged(&swarm);
    Ok(())
}

#[tokio::test]
async fn test_offline_peer_skips_maintenance() -> Result<()> {
    let swarm = gen_swarm(3, JoinMode::Dynamic);
    let peer = swarm.create_peer(3)?;
    peer.stabilize().await?;
    peer.fix_fingers().await?;
    peer.check_predecessor().await?;
    peer.check_successor().await?;
    peer.notify(swarm.network().circle().at(1)).await?;
    assert_eq!(peer.status()?, NodeStatus::Offline);
    assert_eq!(peer.successor()?, None);
    assert_eq!(peer.predecessor()?, None);
    Ok(())
}

#[tokio::test]
async fn test_stabilizer_runs_every_operation() -> Result<()> {
    let swarm = gen_swarm(4, JoinMode::Dynamic);
    gen_ring(&swarm, &[3, 11]).await;
    for _ in 0..5 {
        for peer in swarm.peers() {
            Stabilizer::new(peer).stabilize().await?;
        }
    }
    let p3 = swarm.peer(3).unwrap();
    let p11 = swarm.peer(11).unwrap();
    assert_eq!(p3.successor()?, Some(p11.id()));
    assert_eq!(p11.successor()?, Some(p3.id()));
    assert_eq!(p3.predecessor()?, Some(p11.id()));
    assert_eq!(p11.status()?, NodeStatus::Online);
    Ok(())
}

#[tokio::test]
async fn test_stabilizer_wait_loop() -> Result<()> {
    let swarm = gen_swarm(4, JoinMode::Dynamic);
    gen_ring(&swarm, &[6, 14]).await;
    let p6 = swarm.peer(6).unwrap();
    let p14 = swarm.peer(14).unwrap();

    let loops = futures::future::join(
        Arc::new(Stabilizer::new(p6.clone())).wait(Duration::from_millis(5)),
        Arc::new(Stabilizer::new(p14.clone())).wait(Duration::from_millis(5)),
    );
    let _ = tokio::time::timeout(Duration::from_millis(300), loops).await;

    assert_eq!(p6.successor()?, Some(p14.id()));
    assert_eq!(p14.successor()?, Some(p6.id()));
    Ok(())
}
