use wolf_core::model::{Agent, GameInfo, Judge, Role, Species, Status, Talk};

/// Day-one snapshot with everybody alive and only our own role known.
pub(crate) fn table(players: usize, me: u8, role: Role) -> GameInfo {
    let agent_list = Agent::roster(players);
    let me = Agent::new(me);
    GameInfo {
        day: 1,
        me: Some(me),
        status_map: agent_list.iter().map(|a| (*a, Status::Alive)).collect(),
        role_map: [(me, role)].into_iter().collect(),
        agent_list,
        ..GameInfo::default()
    }
}

pub(crate) fn say(info: &mut GameInfo, speaker: u8, text: &str) {
    let idx = info.talk_list.len();
    info.talk_list.push(Talk {
        idx,
        day: info.day,
        turn: 0,
        agent: Agent::new(speaker),
        text: text.to_string(),
    });
}

pub(crate) fn kill(info: &mut GameInfo, agent: u8) {
    info.status_map.insert(Agent::new(agent), Status::Dead);
}

pub(crate) fn next_day(info: &mut GameInfo) {
    info.day += 1;
    info.talk_list.clear();
}

pub(crate) fn judge(me: u8, day: u32, target: u8, result: Species) -> Judge {
    Judge::new(Agent::new(me), day, Agent::new(target), result)
}
