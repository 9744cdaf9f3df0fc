pub mod charge_node;
