//! Scenario catalog
//!
//! The fixed set of worlds a new adventure can start in. The world setting
//! sent to the backend is "<name> - <desc>".

use crate::session::Session;

/// One selectable starting world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scenario {
    pub id: &'static str,
    pub name: &'static str,
    pub desc: &'static str,
}

/// All selectable scenarios
pub const SCENARIOS: [Scenario; 5] = [
    Scenario {
        id: "rules_horror",
        name: "规则怪谈",
        desc: "你穿越到了一个充满诡异规则的世界。遵守规则是生存的唯一方式，但规则本身......可能是假的。",
    },
    Scenario {
        id: "xiuxian",
        name: "修仙模拟器",
        desc: "凡人修仙，逆天改命。从炼气期开始你的长生之路。",
    },
    Scenario {
        id: "zombie",
        name: "末日生存",
        desc: "丧尸围城，资源匮乏。你不仅要活下去，还要寻找人类最后的希望。",
    },
    Scenario {
        id: "cyberpunk",
        name: "夜之城传奇",
        desc: "霓虹闪烁的赛博朋克世界。义体改造、骇客入侵、公司战争。",
    },
    Scenario {
        id: "office",
        name: "职场升职记",
        desc: "开局被裁员，背负巨额房贷。如何在尔虞我诈的职场中逆袭？",
    },
];

/// Look up a scenario by id
pub fn find(id: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|s| s.id == id)
}

impl Scenario {
    /// World-setting prose forwarded to the backend
    pub fn world_setting(&self) -> String {
        format!("{} - {}", self.name, self.desc)
    }

    /// The situational action auto-submitted when the adventure starts
    pub fn opening_action(&self) -> String {
        format!("我醒来了。这里是哪里？(背景：{})", self.name)
    }

    /// A fresh session in this world with the starting stats
    pub fn new_session(&self) -> Session {
        Session::new(self.id, self.world_setting())
    }
}
