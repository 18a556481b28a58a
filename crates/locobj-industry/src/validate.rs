//! Range checks over a decoded industry object.

use locobj_common::SENTINEL;

use crate::IndustryObject;

/// Highest variation count the game accepts.
const MAX_VALID_VARIATIONS: u8 = 31;
/// Most industries of one type a scenario may contain.
const MAX_TOTAL_OF_TYPE: u8 = 32;

impl IndustryObject<'_> {
    /// Check every scalar against the range the game accepts.
    ///
    /// Only decoded fields are inspected; the backing buffer is not read.
    pub fn validate(&self) -> bool {
        if self.num_building_parts == 0 {
            return false;
        }
        if self.num_building_variations == 0 || self.num_building_variations > MAX_VALID_VARIATIONS {
            return false;
        }

        if self.max_num_buildings < self.min_num_buildings {
            return false;
        }

        if self.total_of_type_in_scenario == 0 || self.total_of_type_in_scenario > MAX_TOTAL_OF_TYPE {
            return false;
        }

        // Clearing may refund at most 230/256 (about 90%) of the build cost.
        let cost = self.cost_factor as i32;
        let clear_cost = self.clear_cost_factor as i32;
        if -clear_cost > cost * 230 / 256 {
            return false;
        }

        if self.scaffolding_segment_type > 8 {
            return false;
        }
        if !matches!(self.farm_tile_num_image_angles, 1 | 2 | 4) {
            return false;
        }

        let no_production = self.farm_growth_stage_with_no_production;
        if no_production != SENTINEL && no_production > 7 {
            return false;
        }

        if self.farm_num_stages_of_growth > 8 {
            return false;
        }

        if self.initial_production_rate[0].max > 100 {
            return false;
        }
        self.initial_production_rate[1].max <= 100
    }
}

#[cfg(test)]
mod tests {
    use crate::fixture::{Collaborators, IndustryFixture};
    use crate::IndustryObject;

    fn check(data: &[u8], edit: impl FnOnce(&mut IndustryObject<'_>)) -> bool {
        let mut env = Collaborators::new();
        let mut object = IndustryObject::decode(data, &mut env.context(), None).unwrap();
        edit(&mut object);
        object.validate()
    }

    #[test]
    fn test_fixture_is_valid() {
        let data = IndustryFixture::default().encode();
        assert!(check(&data, |_| {}));
    }

    #[test]
    fn test_boundary_extremes_pass() {
        let data = IndustryFixture::default().encode();
        assert!(check(&data, |o| {
            o.num_building_parts = 255;
            o.num_building_variations = 31;
            o.min_num_buildings = 7;
            o.max_num_buildings = 7;
            o.total_of_type_in_scenario = 32;
            o.scaffolding_segment_type = 8;
            o.farm_tile_num_image_angles = 4;
            o.farm_growth_stage_with_no_production = 7;
            o.farm_num_stages_of_growth = 8;
            o.initial_production_rate[0].max = 100;
            o.initial_production_rate[1].max = 100;
        }));
        assert!(check(&data, |o| {
            o.num_building_parts = 1;
            o.num_building_variations = 1;
            o.total_of_type_in_scenario = 1;
            o.scaffolding_segment_type = 0;
            o.farm_tile_num_image_angles = 1;
            o.farm_growth_stage_with_no_production = 0;
            o.initial_production_rate[0].max = 0;
            o.initial_production_rate[1].max = 0;
        }));
    }

    #[test]
    fn test_single_field_out_of_range_fails() {
        let data = IndustryFixture::default().encode();

        assert!(!check(&data, |o| o.num_building_parts = 0));
        assert!(!check(&data, |o| o.num_building_variations = 0));
        assert!(!check(&data, |o| o.num_building_variations = 32));
        assert!(!check(&data, |o| {
            o.min_num_buildings = 4;
            o.max_num_buildings = 3;
        }));
        assert!(!check(&data, |o| o.total_of_type_in_scenario = 0));
        assert!(!check(&data, |o| o.total_of_type_in_scenario = 33));
        assert!(!check(&data, |o| o.scaffolding_segment_type = 9));
        for angles in [0, 3, 5, 8] {
            assert!(!check(&data, |o| o.farm_tile_num_image_angles = angles));
        }
        assert!(!check(&data, |o| o.farm_growth_stage_with_no_production = 8));
        assert!(!check(&data, |o| o.farm_growth_stage_with_no_production = 0xFE));
        assert!(!check(&data, |o| o.farm_num_stages_of_growth = 9));
        assert!(!check(&data, |o| o.initial_production_rate[0].max = 101));
        assert!(!check(&data, |o| o.initial_production_rate[1].max = 101));
    }

    #[test]
    fn test_clear_cost_ratio_edge() {
        let data = IndustryFixture::default().encode();
        assert!(check(&data, |o| {
            o.cost_factor = 256;
            o.clear_cost_factor = -230;
        }));
        assert!(!check(&data, |o| {
            o.cost_factor = 256;
            o.clear_cost_factor = -231;
        }));
    }

    #[test]
    fn test_clear_cost_truncates_toward_zero() {
        let data = IndustryFixture::default().encode();
        // 10 * 230 / 256 = 8 (truncated from 8.98)
        assert!(check(&data, |o| {
            o.cost_factor = 10;
            o.clear_cost_factor = -8;
        }));
        assert!(!check(&data, |o| {
            o.cost_factor = 10;
            o.clear_cost_factor = -9;
        }));
        // -1 * 230 / 256 = 0, so any refund fails and any charge passes.
        assert!(!check(&data, |o| {
            o.cost_factor = -1;
            o.clear_cost_factor = -1;
        }));
        assert!(check(&data, |o| {
            o.cost_factor = -1;
            o.clear_cost_factor = 0;
        }));
    }

    #[test]
    fn test_unloaded_object_is_invalid() {
        let data = IndustryFixture::default().encode();
        let mut env = Collaborators::new();
        let mut object = IndustryObject::decode(&data, &mut env.context(), None).unwrap();
        assert!(object.validate());
        assert!(object.validate());

        object.unload();
        assert!(!object.validate());
    }
}
