use comfy_table::{presets::UTF8_FULL, Table};
use fairdice_core::ProbabilityTable;

pub fn probability_table(probabilities: &ProbabilityTable) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(probabilities.header());

    for row in probabilities.rows() {
        table.add_row(row);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairdice_core::DiceSet;

    #[test]
    fn test_render_contains_every_cell() {
        let dice = DiceSet::parse(&["2,2,4,4,9,9", "1,1,6,6,8,8", "3,3,5,5,7,7"]).unwrap();
        let rendered = probability_table(&ProbabilityTable::new(dice.all(), 4)).to_string();

        assert!(rendered.contains("User dice v"));
        assert!(rendered.contains("[1,1,6,6,8,8]"));
        assert!(rendered.contains("0.5556"));
        assert!(rendered.contains(" - "));
    }
}
