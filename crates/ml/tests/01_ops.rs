use ml::recorder::Recorder;
use ml::*;
use std::collections::HashMap;

fn close(a: &[f32], b: &[f32]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-6)
}

#[test]
fn forward_ops_record_one_node_each() {
    let mut g = Graph::new();
    let mut tensors = HashMap::new();

    let a = Tensor::from_vec(vec![2, 2], vec![1.0, 2.0, 3.0, 4.0]);
    let b = Tensor::from_vec(vec![2, 2], vec![5.0, 6.0, 7.0, 8.0]);
    let bias = Tensor::from_vec(vec![2], vec![0.5, -0.5]);

    let c = a.add(&b, &mut g, &mut tensors);
    let d = a.add_broadcast(&bias, &mut g, &mut tensors);
    let e = c.mul_scalar(-2.0, &mut g, &mut tensors);
    let f = e.relu(&mut g, &mut tensors);
    let s = c.reduce_sum(&mut g, &mut tensors);
    let pick = d.select(3, &mut g, &mut tensors);

    assert_eq!(c.data(), &[6.0, 8.0, 10.0, 12.0]);
    assert_eq!(d.data(), &[1.5, 1.5, 3.5, 3.5]);
    assert_eq!(e.data(), &[-12.0, -16.0, -20.0, -24.0]);
    assert_eq!(f.data(), &[0.0, 0.0, 0.0, 0.0]);
    assert_eq!(s.data(), &[36.0]);
    assert_eq!(pick.item(), 3.5);

    assert_eq!(g.nodes().len(), 6);
    // inputs and outputs all land in the store
    for t in [&a, &b, &bias, &c, &d, &e, &f, &s, &pick] {
        assert!(tensors.contains_key(&t.id));
    }
}

#[test]
fn matmul_handles_batches() {
    let mut g = Graph::new();
    let mut tensors = HashMap::new();
    let w = Tensor::from_vec(vec![2, 3], vec![1.0, 0.0, -1.0, 2.0, 1.0, 0.5]);
    let x = Tensor::from_vec(vec![2, 3], vec![1.0, 2.0, 3.0, -1.0, 0.0, 4.0]);
    let y = w.matmul(&x, &mut g, &mut tensors);
    assert_eq!(y.shape, vec![2, 2]);
    assert!(close(y.data(), &[-2.0, 5.5, -5.0, 0.0]));
}

#[test]
fn log_softmax_rows_normalise() {
    let mut g = Graph::new();
    let mut tensors = HashMap::new();
    let x = Tensor::from_vec(vec![2, 3], vec![1.0, 2.0, 3.0, -50.0, 0.0, 50.0]);
    let y = x.log_softmax(&mut g, &mut tensors);
    for row in y.data().chunks(3) {
        let total: f32 = row.iter().map(|v| v.exp()).sum();
        assert!((total - 1.0).abs() < 1e-6, "row sums to {total}");
        assert!(row.iter().all(|v| v.is_finite() && *v <= 0.0));
    }
    let exp: Vec<f32> = [1.0f32, 2.0, 3.0].iter().map(|v| v.exp()).collect();
    let sum: f32 = exp.iter().sum();
    let expected: Vec<f32> = exp.iter().map(|e| (e / sum).ln()).collect();
    assert!(close(&y.data()[..3], &expected));
}

#[test]
fn log_softmax_survives_huge_logits() {
    let mut g = Graph::new();
    let mut tensors = HashMap::new();
    let x = Tensor::from_vec(vec![1, 2], vec![1.0e30, -1.0e30]);
    let y = x.log_softmax(&mut g, &mut tensors);
    assert_eq!(y.data()[0], 0.0);
    assert!(y.data()[1].is_finite() || y.data()[1] == f32::NEG_INFINITY);
    assert!(y.data()[1].exp() < 1e-6);
}

#[test]
fn ids_are_unique() {
    let a = Tensor::scalar(1.0);
    let b = Tensor::scalar(1.0);
    assert_ne!(a.id, b.id);
    assert!(!a.requires_grad);
    assert!(a.clone().with_grad().requires_grad);
}
