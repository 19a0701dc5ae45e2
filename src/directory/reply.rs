//! Reply text for directory lookups.
//!
//! Replies are HTML fragments: `<br>` separated lines with bold centre names.

use super::matcher::Entities;
use super::record::HealthCenter;

/// Reply when nothing matched.
pub const NO_MATCH_TEXT: &str =
    "Não encontrei centros de saúde com essas informações. Tente especificar o nome, bairro ou distrito.";

const UNKNOWN_PHONE: &str = "não disponível";

/// Build the reply for a lookup.
///
/// The layout follows what the user asked for: a centre name lists matches
/// directly, a single neighbourhood gets a heading, anything else is grouped
/// by neighbourhood under its district.
#[must_use]
pub fn compose_reply(entities: &Entities, centers: &[&HealthCenter]) -> String {
    let Some(first) = centers.first() else {
        return NO_MATCH_TEXT.to_string();
    };

    let groups = group_by_neighborhood(centers);
    let mut out = String::new();

    if entities.center.is_some() {
        out.push_str(&format!(
            "Encontrei {} centro(s) de saúde:",
            centers.len()
        ));
        push_lines(&mut out, centers);
    } else if entities.neighborhood.is_some() && groups.len() == 1 {
        out.push_str(&format!(
            "Encontrei {} centro(s) de saúde no bairro {}:",
            centers.len(),
            groups[0].0
        ));
        push_lines(&mut out, centers);
    } else {
        let district = if first.district.is_empty() {
            "Belo Horizonte"
        } else {
            first.district.as_str()
        };
        out.push_str(&format!(
            "Encontrei {} centro(s) de saúde no distrito {district}:<br>",
            centers.len()
        ));
        for (neighborhood, members) in &groups {
            out.push_str(&format!("<br><br><b>Bairro {neighborhood}:</b>"));
            push_lines(&mut out, members);
        }
    }
    out
}

fn push_lines(out: &mut String, centers: &[&HealthCenter]) {
    for center in centers {
        let phone = if center.phone.is_empty() {
            UNKNOWN_PHONE
        } else {
            center.phone.as_str()
        };
        out.push_str(&format!(
            "<br>• <b>{}</b>: {} | Telefone: {phone}",
            center.name, center.address
        ));
    }
}

/// Group centres by neighbourhood, keeping first-seen order.
fn group_by_neighborhood<'a>(centers: &[&'a HealthCenter]) -> Vec<(&'a str, Vec<&'a HealthCenter>)> {
    let mut groups: Vec<(&str, Vec<&HealthCenter>)> = Vec::new();
    for &center in centers {
        let key = if center.neighborhood.is_empty() {
            "Desconhecido"
        } else {
            center.neighborhood.as_str()
        };
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(center),
            None => groups.push((key, vec![center])),
        }
    }
    groups
}
