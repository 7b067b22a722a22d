use crate::dht::Chord;
use crate::dht::JoinMode;
use crate::dht::NodeStatus;
use crate::error::Error;
use crate::error::Result;
use crate::message::Message;
use crate::message::MessageResponse;
use crate::message::RemotePeer;
use crate::message::Transport;
use crate::tests::default::gen_ring;
use crate::tests::default::gen_swarm;

#[tokio::test]
async fn test_offline_peer_answers_offline() -> Result<()> {
    let swarm = gen_swarm(3, JoinMode::Static);
    let peers = gen_ring(&swarm, &[0, 4]).await;
    let transport = swarm.transport();
    let (p0, p4) = (peers[0].id(), peers[1].id());

    swarm.remove(4).await?;
    let ask = |message| transport.send_message(p0, p4, message);
    assert_eq!(
        ask(Message::Status).await?,
        MessageResponse::Status(NodeStatus::Offline)
    );
    assert_eq!(ask(Message::Successor).await?, MessageResponse::Offline);
    assert_eq!(
        ask(Message::FindSuccessor(p0)).await?,
        MessageResponse::Offline
    );
    assert_eq!(
        ask(Message::LookupLocal("k".into())).await?,
        MessageResponse::Offline
    );
    // notify stays a silent no-op
    assert_eq!(ask(Message::Notify(p0)).await?, MessageResponse::Done);
    Ok(())
}

#[tokio::test]
async fn test_remote_peer_maps_offline() -> Result<()> {
    let swarm = gen_swarm(3, JoinMode::Static);
    let peers = gen_ring(&swarm, &[0, 4]).await;
    let remote = RemotePeer::new(peers[0].id(), peers[1].id(), swarm.transport());

    assert_eq!(remote.successor().await?, Some(peers[0].id()));
    assert_eq!(remote.status().await?, NodeStatus::Online);

    peers[1].leave().await?;
    assert_eq!(remote.successor().await?, None);
    assert_eq!(remote.lookup_local("k").await?, None);
    assert!(matches!(
        remote.store_local("k", "v").await,
        Err(Error::PeerOffline(4))
    ));
    assert!(matches!(
        remote.set_predecessor(None).await,
        Err(Error::PeerOffline(4))
    ));
    assert!(matches!(remote.dump().await, Err(Error::PeerOffline(4))));
    Ok(())
}

#[tokio::test]
async fn test_routing_aborts_at_offline_hop() -> Result<()> {
    let swarm = gen_swarm(3, JoinMode::Static);
    let peers = gen_ring(&swarm, &[0, 2, 5]).await;
    peers[1].leave().await?;
    // 0 routes to 3 through 2, which no longer answers
    let circle = swarm.network().circle().clone();
    assert_eq!(peers[0].find_successor(circle.at(3)).await?, None);
    Ok(())
}

#[tokio::test]
async fn test_left_peer_stops_routing() -> Result<()> {
    let swarm = gen_swarm(3, JoinMode::Static);
    let peers = gen_ring(&swarm, &[0, 4]).await;
    let circle = swarm.network().circle().clone();
    let p0 = &peers[0];
    assert_eq!(p0.find_successor(circle.at(2)).await?, Some(peers[1].id()));

    p0.leave().await?;
    assert_eq!(p0.find_successor(circle.at(2)).await?, None);
    assert_eq!(p0.find_predecessor(circle.at(2)).await?, None);
    assert_eq!(p0.closest_preceding_finger(circle.at(6)).await?, None);
    assert_eq!(p0.owner_of("k").await?, None);
    // the remaining member still routes on its own
    assert_eq!(peers[1].find_successor(circle.at(5)).await?, Some(p0.id()));
    Ok(())
}

#[tokio::test]
async fn test_unregistered_peer_is_not_found() -> Result<()> {
    let swarm = gen_swarm(3, JoinMode::Dynamic);
    let peers = gen_ring(&swarm, &[1]).await;
    let circle = swarm.network().circle().clone();
    let remote = RemotePeer::new(peers[0].id(), circle.at(6), swarm.transport());
    assert!(matches!(remote.status().await, Err(Error::PeerNotFound(6))));
    assert_eq!(peers[0].status_of(circle.at(6)).await, NodeStatus::Offline);
    Ok(())
}
