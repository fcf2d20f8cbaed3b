use crate::hyperplane::{AxisHyperplane, Hyperplane};
use crate::metric::DistanceMetric;
use crate::r#type::CoordNum;
use crate::split::{MedianSplitter, MidpointSplitter};
use crate::stat::{BoundingExtent, NodeStatistic};
use crate::tree::{NodeRef, TreeBuilder};
use crate::variant::TreeVariant;

fn points() -> Vec<(f64, f64)> {
    let coords: Vec<[i32; 2]> = vec![
        [54, 1],
        [97, 21],
        [65, 35],
        [33, 54],
        [95, 39],
        [54, 3],
        [53, 54],
        [84, 72],
        [33, 34],
        [43, 15],
        [52, 83],
        [81, 23],
        [1, 61],
        [38, 74],
        [11, 91],
        [24, 56],
        [90, 31],
        [25, 57],
        [46, 61],
        [29, 69],
        [49, 60],
        [4, 98],
        [71, 15],
        [60, 25],
        [38, 84],
        [52, 38],
        [94, 51],
        [13, 25],
        [77, 73],
        [88, 87],
        [6, 27],
        [58, 22],
        [53, 28],
        [27, 91],
        [96, 98],
        [93, 14],
        [22, 93],
        [45, 94],
        [18, 28],
        [35, 15],
        [19, 81],
        [20, 81],
        [67, 53],
        [43, 3],
        [47, 66],
        [48, 34],
        [46, 12],
        [32, 38],
        [43, 12],
        [39, 94],
        [88, 62],
        [66, 14],
        [84, 30],
        [72, 81],
        [41, 92],
        [26, 4],
        [6, 76],
        [47, 21],
        [57, 70],
        [71, 82],
        [50, 68],
        [96, 18],
        [40, 31],
        [78, 53],
        [71, 90],
        [32, 14],
        [55, 6],
        [32, 88],
        [62, 32],
        [21, 67],
        [73, 81],
        [44, 64],
        [29, 50],
        [70, 5],
        [6, 22],
        [68, 3],
        [11, 23],
        [20, 42],
        [21, 73],
        [63, 86],
        [9, 40],
        [99, 2],
        [99, 76],
        [56, 77],
        [83, 6],
        [21, 72],
        [78, 30],
        [75, 53],
        [41, 11],
        [95, 20],
        [30, 38],
        [96, 82],
        [65, 48],
        [33, 18],
        [87, 28],
        [10, 10],
        [40, 34],
        [10, 20],
        [47, 29],
        [46, 78],
    ];

    coords
        .into_iter()
        .map(|[x, y]| (x.into(), y.into()))
        .collect()
}

fn builder(leaf_size: usize) -> TreeBuilder<f64> {
    let mut builder = TreeBuilder::new(2).leaf_size(leaf_size);
    for (x, y) in points() {
        builder.add(&[x, y]);
    }
    builder
}

fn collect_leaves<'a, N, P, M, S, V>(node: NodeRef<'a, N, P, M, S, V>, out: &mut Vec<&'a [u32]>)
where
    N: CoordNum,
    P: Hyperplane<N>,
    M: DistanceMetric<N>,
    S: NodeStatistic<N>,
    V: TreeVariant,
{
    if node.is_leaf() {
        out.push(node.indices());
    } else {
        collect_leaves(node.left_child().unwrap(), out);
        collect_leaves(node.right_child().unwrap(), out);
    }
}

fn collect_planes<N, M, S, V>(
    node: NodeRef<'_, N, AxisHyperplane<N>, M, S, V>,
    out: &mut Vec<AxisHyperplane<N>>,
) where
    N: CoordNum,
    M: DistanceMetric<N>,
    S: NodeStatistic<N>,
    V: TreeVariant,
{
    if let Some(plane) = node.hyperplane() {
        out.push(*plane);
        collect_planes(node.left_child().unwrap(), out);
        collect_planes(node.right_child().unwrap(), out);
    }
}

#[test]
fn leaf_occupancy_and_exact_permutation() {
    let tree = builder(10).finish::<MidpointSplitter>().unwrap();

    let mut leaves = vec![];
    collect_leaves(tree.root(), &mut leaves);
    for leaf in &leaves {
        assert!(leaf.len() <= 10, "leaf holds at most leaf_size points");
    }

    // the leaves concatenated in tree order are exactly the index buffer, and the buffer
    // is a permutation of the original indices
    let concatenated: Vec<u32> = leaves.concat();
    assert_eq!(concatenated, tree.indices());
    let mut sorted = concatenated;
    sorted.sort_unstable();
    let expected: Vec<u32> = (0..100).collect();
    assert_eq!(sorted, expected);
}

#[test]
fn node_ranges_span_children() {
    let tree = builder(8).finish::<MedianSplitter>().unwrap();

    fn check<N, P, M, S, V>(node: NodeRef<'_, N, P, M, S, V>)
    where
        N: CoordNum,
        P: Hyperplane<N>,
        M: DistanceMetric<N>,
        S: NodeStatistic<N>,
        V: TreeVariant,
    {
        if node.is_parent() {
            let left = node.left_child().unwrap();
            let right = node.right_child().unwrap();
            assert_eq!(node.num_points(), left.num_points() + right.num_points());
            check(left);
            check(right);
        }
    }
    check(tree.root());
    assert_eq!(tree.root().num_points(), 100);
}

#[test]
fn construction_is_deterministic() {
    let first = builder(5).finish::<MidpointSplitter>().unwrap();
    let second = builder(5).finish::<MidpointSplitter>().unwrap();

    assert_eq!(first.indices(), second.indices());

    let mut first_planes = vec![];
    let mut second_planes = vec![];
    collect_planes(first.root(), &mut first_planes);
    collect_planes(second.root(), &mut second_planes);
    assert_eq!(first_planes, second_planes);
}

#[test]
fn spill_coverage_and_bounded_duplication() {
    let tree = builder(10)
        .overlap_fraction(0.25)
        .finish_spill::<MidpointSplitter>()
        .unwrap();

    let mut leaves = vec![];
    collect_leaves(tree.root(), &mut leaves);
    for leaf in &leaves {
        assert!(leaf.len() <= 10);
    }

    // every original index appears in at least one leaf
    let mut deduplicated: Vec<u32> = tree.indices().to_vec();
    deduplicated.sort_unstable();
    deduplicated.dedup();
    let expected: Vec<u32> = (0..100).collect();
    assert_eq!(deduplicated, expected);

    // regression bound on the total duplicated reference count
    assert!(tree.indices().len() >= 100);
    assert!(
        tree.indices().len() <= 400,
        "duplication exceeded the regression bound: {} references",
        tree.indices().len()
    );
}

#[test]
fn zero_overlap_spill_tree_is_a_permutation() {
    let tree = builder(10).finish_spill::<MidpointSplitter>().unwrap();
    assert!(tree.is_spill());

    let mut sorted: Vec<u32> = tree.indices().to_vec();
    sorted.sort_unstable();
    let expected: Vec<u32> = (0..100).collect();
    assert_eq!(sorted, expected);
}

#[test]
fn identical_points_still_build() {
    let mut builder = TreeBuilder::<f64>::new(3).leaf_size(4);
    for _ in 0..20 {
        builder.add(&[7.0, -1.0, 2.5]);
    }
    let tree = builder.finish::<MidpointSplitter>().unwrap();

    let mut leaves = vec![];
    collect_leaves(tree.root(), &mut leaves);
    for leaf in &leaves {
        assert!(leaf.len() <= 4);
    }
    let mut sorted: Vec<u32> = tree.indices().to_vec();
    sorted.sort_unstable();
    let expected: Vec<u32> = (0..20).collect();
    assert_eq!(sorted, expected);
}

#[test]
fn statistic_aggregates_bottom_up() {
    let data = points();
    let tree = builder(10)
        .with_statistic::<BoundingExtent<f64>>()
        .finish::<MidpointSplitter>()
        .unwrap();

    let root = tree.root();
    let extent = root.statistic();
    let min_x = data.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let max_y = data.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(extent.min(0), min_x);
    assert_eq!(extent.max(1), max_y);

    // a child's extent never exceeds its parent's
    let left = root.left_child().unwrap();
    assert!(left.statistic().min(0) >= extent.min(0));
    assert!(left.statistic().max(0) <= extent.max(0));
}

#[test]
fn rejects_invalid_configurations() {
    assert!(builder(0).finish::<MidpointSplitter>().is_err());
    assert!(builder(10)
        .overlap_fraction(1.0)
        .finish_spill::<MidpointSplitter>()
        .is_err());
    assert!(builder(10)
        .overlap_fraction(-0.1)
        .finish_spill::<MidpointSplitter>()
        .is_err());
    // nonzero overlap requires a spill tree
    assert!(builder(10)
        .overlap_fraction(0.2)
        .finish::<MidpointSplitter>()
        .is_err());
    // empty point set
    assert!(TreeBuilder::<f64>::new(2)
        .finish::<MidpointSplitter>()
        .is_err());
}

#[test]
#[should_panic(expected = "dimension")]
fn add_rejects_mismatched_points() {
    let mut builder = TreeBuilder::<f64>::new(2);
    builder.add(&[1.0, 2.0, 3.0]);
}
