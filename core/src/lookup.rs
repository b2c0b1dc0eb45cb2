//! Searches over the list and balance views.
//!
//! Names and nicknames compare case-insensitively; ids compare exactly. The
//! first match in server order wins, and no match is `None`.

use crate::types::{ExpenseList, Member, MemberRef};

fn same_text(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

pub fn list_by_name<'a>(lists: &'a [ExpenseList], name: &str) -> Option<&'a ExpenseList> {
    lists.iter().find(|list| same_text(&list.name, name))
}

pub fn member_by_nickname<'a>(members: &'a [Member], nickname: &str) -> Option<&'a Member> {
    members.iter().find(|m| same_text(&m.nickname, nickname))
}

pub fn member_by_id<'a>(members: &'a [Member], id: &str) -> Option<&'a Member> {
    members.iter().find(|m| m.id == id)
}

pub fn find_member<'a>(members: &'a [Member], member: MemberRef<'_>) -> Option<&'a Member> {
    match member {
        MemberRef::Nickname(nickname) => member_by_nickname(members, nickname),
        MemberRef::Id(id) => member_by_id(members, id),
    }
}
