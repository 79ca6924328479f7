use std::collections::BTreeMap;

use wolf_bot::SeriesPlayer;
use wolf_core::content::Content;
use wolf_core::model::{Agent, Alignment, GameInfo, GameSetting, Role, Status, Talk};
use wolf_core::stats::HistoricalSignal;

const DEALS: [[Role; 5]; 3] = [
    [Role::Villager, Role::Seer, Role::Villager, Role::Possessed, Role::Werewolf],
    [Role::Werewolf, Role::Villager, Role::Seer, Role::Villager, Role::Possessed],
    [Role::Villager, Role::Werewolf, Role::Possessed, Role::Seer, Role::Villager],
];

fn view(me: Agent, deal: &[Role; 5]) -> GameInfo {
    let agent_list = Agent::roster(deal.len());
    GameInfo {
        day: 1,
        me: Some(me),
        status_map: agent_list.iter().map(|a| (*a, Status::Alive)).collect(),
        role_map: [(me, deal[me.index() as usize - 1])].into_iter().collect(),
        agent_list,
        ..GameInfo::default()
    }
}

fn reveal_all(info: &mut GameInfo, deal: &[Role; 5], dead: &[Agent]) {
    for agent in dead {
        info.status_map.insert(*agent, Status::Dead);
    }
    let roles: BTreeMap<Agent, Role> = info.agent_list.iter().copied().zip(deal.iter().copied()).collect();
    info.role_map = roles;
}

/// Plays one scripted day for `me`, then reveals the board with `dead` eliminated.
fn play(player: &mut SeriesPlayer, me: Agent, deal: &[Role; 5], dead: &[Agent]) {
    let setting = GameSetting::standard(5);
    let mut info = view(me, deal);
    player.initialize(&info, &setting).unwrap();
    player.update(&info).unwrap();
    player.day_start().unwrap();

    info.talk_list.push(Talk {
        idx: 0,
        day: 1,
        turn: 0,
        agent: Agent::new(if me == Agent::new(2) { 3 } else { 2 }),
        text: "VOTE Agent[05]".to_string(),
    });
    player.update(&info).unwrap();
    for _ in 0..3 {
        let content = player.talk().unwrap();
        if let Content::Vote { target, .. } = content {
            assert_ne!(target, me);
        }
    }
    let vote = player.vote().unwrap();
    assert!(info.is_alive(vote));

    reveal_all(&mut info, deal, dead);
    player.update(&info).unwrap();
    player.finish().unwrap();
    player.finish().unwrap();
}

#[test]
fn every_game_is_counted_once_in_the_right_table() {
    let me = Agent::new(1);
    let mut player = SeriesPlayer::new(42);

    // deal 0: werewolf side wiped out; deal 1: werewolf alive; deal 2: village wins.
    play(&mut player, me, &DEALS[0], &[Agent::new(4), Agent::new(5)]);
    play(&mut player, me, &DEALS[1], &[Agent::new(2), Agent::new(3)]);
    play(&mut player, me, &DEALS[2], &[Agent::new(2), Agent::new(3)]);

    assert_eq!(player.games_completed(), 3);
    let stats = player.statistics();
    for agent in Agent::roster(5) {
        assert_eq!(stats.games_for(agent), 3, "{agent} should have three games");
    }

    let village = stats.table(Alignment::Village);
    let werewolf = stats.table(Alignment::Werewolf);
    assert_eq!(village.get(me).wins, 2);
    assert_eq!(werewolf.get(me).wins, 1);
    assert_eq!(werewolf.get(Agent::new(5)).losses, 1);
    assert_eq!(werewolf.get(Agent::new(5)).wins, 1);
}

#[test]
fn signal_appears_only_after_the_first_recorded_game() {
    let me = Agent::new(3);
    let mut player = SeriesPlayer::new(7);
    assert_eq!(player.signal(), HistoricalSignal::NONE);

    play(&mut player, me, &DEALS[0], &[Agent::new(4), Agent::new(5)]);
    let signal = player.signal();
    assert_eq!(signal.strongest_village, Some(Agent::new(1)));
    assert_eq!(signal.strongest_werewolf, None);

    play(&mut player, me, &DEALS[1], &[Agent::new(2), Agent::new(3)]);
    let signal = player.signal();
    assert!(signal.strongest_werewolf.is_some());
}

#[test]
fn every_role_finishes_a_game_without_engine_errors() {
    for seat in 1..=5u8 {
        let mut player = SeriesPlayer::new(u64::from(seat));
        for deal in &DEALS {
            play(&mut player, Agent::new(seat), deal, &[Agent::new(2)]);
        }
        assert_eq!(player.games_completed(), 3);
    }
}
