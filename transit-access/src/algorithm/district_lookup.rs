use crate::{
    algorithm::geometry,
    model::{AccessError, Crs, Layer, ScoredDistrict},
};
use geo::{BoundingRect, Contains, Point};
use rstar::{
    primitives::{GeomWithData, Rectangle},
    RTree, AABB,
};

type DistrictEnvelope = GeomWithData<Rectangle<[f64; 2]>, usize>;

/// answers "which stop serves the district under this point" for map clicks.
pub struct DistrictLookup {
    districts: Vec<ScoredDistrict>,
    rtree: RTree<DistrictEnvelope>,
    query_crs: Crs,
}

impl DistrictLookup {
    /// indexes the scored districts. queries are latitude/longitude pairs in `query_crs`.
    pub fn new(
        scored: &Layer<ScoredDistrict>,
        query_crs: Crs,
    ) -> Result<DistrictLookup, AccessError> {
        if !query_crs.is_geographic() {
            return Err(AccessError::InvalidParameter(format!(
                "district lookup queries must use a geographic reference system, found {query_crs}"
            )));
        }
        let districts = geometry::to_projected(scored)?.rows;
        let envelopes = districts
            .iter()
            .enumerate()
            .filter_map(|(idx, d)| {
                d.district.geometry.bounding_rect().map(|r| {
                    GeomWithData::new(
                        Rectangle::from_corners([r.min().x, r.min().y], [r.max().x, r.max().y]),
                        idx,
                    )
                })
            })
            .collect::<Vec<_>>();
        Ok(DistrictLookup {
            districts,
            rtree: RTree::bulk_load(envelopes),
            query_crs,
        })
    }

    /// the district containing a point in the metric reference system. if
    /// districts overlap, the one listed first wins.
    pub fn containing(&self, point: &Point<f64>) -> Option<&ScoredDistrict> {
        let query = AABB::from_point([point.x(), point.y()]);
        self.rtree
            .locate_in_envelope_intersecting(&query)
            .map(|candidate| candidate.data)
            .filter(|idx| self.districts[*idx].district.geometry.contains(point))
            .min()
            .map(|idx| &self.districts[idx])
    }

    /// the assigned stop name of the district containing the point, or None
    /// when no district contains it.
    pub fn stop_name_at(&self, latitude: f64, longitude: f64) -> Result<Option<&str>, AccessError> {
        let point = geometry::project_lat_lon(latitude, longitude, self.query_crs)?;
        let found = self.containing(&point).map(|d| d.stop_name.as_str());
        if found.is_none() {
            log::debug!("no district contains ({latitude}, {longitude})");
        }
        Ok(found)
    }
}
