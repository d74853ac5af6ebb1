use marches_common::model::marche::Marche;
use marches_common::pagination::{Page, paginate};
use marches_common::sequence::RequestSequencer;

fn page_of(ids: std::ops::Range<i64>, page: usize) -> Page<Marche> {
    let data: Vec<Marche> = ids
        .map(|id| Marche {
            id,
            num_marche: format!("{id}/2024"),
            objet: String::new(),
            annee: 2024,
            num_boite: None,
            organisme: None,
            type_communaute_publique: None,
            latitude: None,
            longitude: None,
            created_at: None,
        })
        .collect();
    Page {
        data,
        page,
        limit: 25,
        total_pages: 2,
        total_items: 30,
    }
}

#[test]
fn second_page_of_thirty() {
    let items: Vec<u32> = (1..=30).collect();
    let page = paginate(&items, 2, 25);
    assert_eq!(page.data, vec![26, 27, 28, 29, 30]);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.total_items, 30);
}

#[test]
fn late_first_page_does_not_replace_second() {
    let mut sequencer = RequestSequencer::new();
    let mut shown: Option<Page<Marche>> = None;

    let first = sequencer.issue();
    let second = sequencer.issue();

    for (ticket, response) in [(second, page_of(25..30, 2)), (first, page_of(0..25, 1))] {
        if sequencer.is_current(ticket) {
            shown = Some(response);
        }
    }

    let shown = shown.expect("second page applied");
    assert_eq!(shown.page, 2);
    assert_eq!(shown.data.len(), 5);
}
