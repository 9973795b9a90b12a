//! Group and member roster.
//!
//! The built-in roster is compiled into the binary. A custom roster can be
//! loaded from a TOML file with the same shape:
//!
//! ```toml
//! [[groups]]
//! name = "ルトミ"
//! cameko_hashtag = false
//!
//! [[groups.members]]
//! name = "黒嵜 菜々子"
//! account = "0516_nanako"
//! ```

use crate::error::CamekoError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Suffix appended to the group tag for the photographer hashtag.
pub const CAMEKO_SUFFIX: &str = "_カメコ";

/// One performer with a public account handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub account: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific_hashtag: Option<String>,
}

impl Member {
    /// Build a member whose profile lives at `https://x.com/<account>`.
    #[must_use]
    pub fn on_x(name: &str, account: &str) -> Self {
        Self {
            name: name.to_string(),
            account: account.to_string(),
            profile_url: Some(format!("https://x.com/{account}")),
            specific_hashtag: None,
        }
    }
}

/// A named roster plus its hashtag policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    /// Whether `#<group>_カメコ` follows the plain group tag.
    #[serde(default = "default_true")]
    pub cameko_hashtag: bool,
    #[serde(default)]
    pub members: Vec<Member>,
}

impl Group {
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Group tags in output order.
    #[must_use]
    pub fn hashtags(&self) -> Vec<String> {
        group_hashtags(&self.name, self.cameko_hashtag)
    }
}

/// Tags emitted for a group name: `#group`, then `#group_カメコ` when enabled.
#[must_use]
pub fn group_hashtags(group: &str, cameko_hashtag: bool) -> Vec<String> {
    if group.is_empty() {
        return Vec::new();
    }
    let mut tags = vec![format!("#{group}")];
    if cameko_hashtag {
        tags.push(format!("#{group}{CAMEKO_SUFFIX}"));
    }
    tags
}

/// Read-only lookup table from group name to members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directory {
    groups: Vec<Group>,
}

impl Default for Directory {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Directory {
    /// The compiled-in roster.
    #[must_use]
    pub fn builtin() -> Self {
        let groups = BUILTIN
            .iter()
            .map(|g| Group {
                name: g.name.to_string(),
                cameko_hashtag: g.cameko_hashtag,
                members: g
                    .members
                    .iter()
                    .map(|(name, account)| Member::on_x(name, account))
                    .collect(),
            })
            .collect();
        Self { groups }
    }

    #[must_use]
    pub const fn from_groups(groups: Vec<Group>) -> Self {
        Self { groups }
    }

    /// Parse a roster from TOML text.
    ///
    /// # Errors
    ///
    /// Returns the TOML error when the text does not match the roster shape.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load a roster file from disk.
    ///
    /// # Errors
    ///
    /// Returns [`CamekoError::Io`] when the file cannot be read and
    /// [`CamekoError::DirectoryParse`] when it is not a valid roster.
    pub fn load(path: &Path) -> Result<Self, CamekoError> {
        let text = std::fs::read_to_string(path).map_err(|source| CamekoError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let directory =
            Self::from_toml_str(&text).map_err(|source| CamekoError::DirectoryParse {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!(
            path = %path.display(),
            groups = directory.groups.len(),
            "loaded custom roster"
        );
        Ok(directory)
    }

    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    #[must_use]
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    #[must_use]
    pub fn member(&self, group: &str, name: &str) -> Option<&Member> {
        self.group(group)?.member(name)
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.name.as_str())
    }

    /// Whether `group` gets the `_カメコ` tag. Unknown groups keep the suffix.
    #[must_use]
    pub fn cameko_hashtag(&self, group: &str) -> bool {
        self.group(group).is_none_or(|g| g.cameko_hashtag)
    }
}

const fn default_true() -> bool {
    true
}

struct BuiltinGroup {
    name: &'static str,
    cameko_hashtag: bool,
    members: &'static [(&'static str, &'static str)],
}

const BUILTIN: &[BuiltinGroup] = &[
    BuiltinGroup {
        name: "イコラブ",
        cameko_hashtag: true,
        members: &[
            ("大谷 映美里", "otani_emiri"),
            ("大場 花菜", "hana_oba"),
            ("音嶋 莉沙", "otoshima_risa"),
            ("齋藤 樹愛羅", "saitou_kiara"),
            ("佐々木 舞香", "sasaki_maika"),
            ("髙松 瞳", "takamatsuhitomi"),
            ("瀧脇 笙古", "shoko_takiwaki"),
            ("野口 衣織", "noguchi_iori"),
            ("諸橋 沙夏", "morohashi_sana"),
            ("山本 杏奈", "yamamoto_anna_"),
        ],
    },
    BuiltinGroup {
        name: "ノイミー",
        cameko_hashtag: true,
        members: &[
            ("尾木 波菜", "ogi_hana_"),
            ("落合 希来里", "ochiai_kirari"),
            ("蟹沢 萌子", "kanisawa_moeko"),
            ("河口 夏音", "kawaguchi_natsu"),
            ("川中子 奈月心", "kawanagonatsumi"),
            ("櫻井 もも", "_sakurai_momo_"),
            ("菅波 美玲", "suganami_mirei"),
            ("鈴木 瞳美", "suzuki_hitomi_"),
            ("谷崎 早耶", "tanizaki_saya"),
            ("冨田 菜々風", "tomita_nanaka"),
            ("永田 詩央里", "nagata_shiori_"),
            ("本田 珠由記", "honda_miyuki_"),
        ],
    },
    BuiltinGroup {
        name: "ニアジョイ",
        cameko_hashtag: true,
        members: &[
            ("逢田 珠里依", "aida_jurii"),
            ("天野 香乃愛", "amano_konoa"),
            ("市原 愛弓", "ichihara_ayumi_"),
            ("江角 怜音", "esumi_renon"),
            ("大信田 美月", "oshida_mitsuki"),
            ("大西 葵", "onishi_aoi"),
            ("小澤 愛実", "ozawa_aimi__"),
            ("髙橋 舞", "takahashi_mai__"),
            ("藤沢 莉子", "fujisawa_riko"),
            ("村山 結香", "murayama_yuuka"),
            ("山田 杏佳", "yamada_momoka__"),
            ("山野 愛月", "yamano_arisu"),
        ],
    },
    BuiltinGroup {
        name: "ルトミ",
        cameko_hashtag: false,
        members: &[
            ("黒嵜 菜々子", "0516_nanako"),
            ("反田 葉月", "tanda_hazuki"),
            ("貫井 夢生", "nuu_00000"),
            ("小田垣 有咲", "ariarisan_0104"),
            ("才川 水希", "mi_saikawa"),
            ("天宮 さくら", "saku___39ra"),
            ("朝比奈 麗桜", "sns_nigatekamo"),
        ],
    },
];
