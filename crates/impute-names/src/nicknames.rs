//! Canonical forms for common first-name nicknames

use std::collections::HashMap;

use lazy_static::lazy_static;

lazy_static! {
    /// Nickname to canonical first-name table, applied once during parsing
    static ref NICKNAMES: HashMap<&'static str, &'static str> = {
        let pairs = [
            ("abe", "abraham"),
            ("al", "albert"),
            ("alex", "alexander"),
            ("andy", "andrew"),
            ("art", "arthur"),
            ("barb", "barbara"),
            ("ben", "benjamin"),
            ("beth", "elizabeth"),
            ("betty", "elizabeth"),
            ("bill", "william"),
            ("billy", "william"),
            ("bob", "robert"),
            ("bobby", "robert"),
            ("cathy", "catherine"),
            ("charlie", "charles"),
            ("chris", "christopher"),
            ("chuck", "charles"),
            ("dan", "daniel"),
            ("danny", "daniel"),
            ("dave", "david"),
            ("debbie", "deborah"),
            ("dick", "richard"),
            ("don", "donald"),
            ("doug", "douglas"),
            ("ed", "edward"),
            ("eddie", "edward"),
            ("fred", "frederick"),
            ("gene", "eugene"),
            ("greg", "gregory"),
            ("hank", "henry"),
            ("jack", "john"),
            ("jeff", "jeffrey"),
            ("jenny", "jennifer"),
            ("jim", "james"),
            ("jimmy", "james"),
            ("joe", "joseph"),
            ("kate", "katherine"),
            ("kathy", "katherine"),
            ("ken", "kenneth"),
            ("larry", "lawrence"),
            ("liz", "elizabeth"),
            ("matt", "matthew"),
            ("mike", "michael"),
            ("nate", "nathaniel"),
            ("nick", "nicholas"),
            ("peggy", "margaret"),
            ("pete", "peter"),
            ("phil", "philip"),
            ("ray", "raymond"),
            ("rick", "richard"),
            ("rob", "robert"),
            ("ron", "ronald"),
            ("sam", "samuel"),
            ("steve", "stephen"),
            ("sue", "susan"),
            ("ted", "theodore"),
            ("tim", "timothy"),
            ("tom", "thomas"),
            ("tommy", "thomas"),
            ("tony", "anthony"),
            ("walt", "walter"),
            ("will", "william"),
        ];
        pairs.iter().copied().collect()
    };
}

/// Resolve a first-name token to its canonical form, if it is a known
/// nickname; otherwise the token is returned unchanged.
pub fn canonical_first_name(name: &str) -> &str {
    NICKNAMES.get(name).copied().unwrap_or(name)
}
