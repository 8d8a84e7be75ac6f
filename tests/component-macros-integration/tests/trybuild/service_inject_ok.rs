use component_macros::ServiceInject;
use infrastructure_common::{Lifetime, ServiceInject};

#[derive(ServiceInject)]
#[service_inject(transient)]
struct OkService;

#[derive(ServiceInject)]
struct Cache<K: Send + Sync + 'static> {
    _keys: Vec<K>,
}

fn main() {
    assert_eq!(OkService::LIFETIME, Lifetime::Transient);
    assert_eq!(<Cache<String> as ServiceInject>::LIFETIME, Lifetime::Scoped);
}
