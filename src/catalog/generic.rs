//! Dataset-agnostic queries, used for BSBM, YAGO and custom stores

use super::Category;

pub const PREFIX: &str = "\
PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
PREFIX owl: <http://www.w3.org/2002/07/owl#>
";

pub fn queries(category: Category) -> &'static [(&'static str, &'static str)] {
    match category {
        Category::Simple => &[
            (
                "Simple - Basic triple pattern",
                "SELECT ?s ?p ?o
WHERE {
    ?s ?p ?o .
}
LIMIT 100",
            ),
            (
                "Simple - Typed entities",
                "SELECT ?entity ?type
WHERE {
    ?entity rdf:type ?type .
}
LIMIT 100",
            ),
        ],
        Category::Join => &[
            (
                "Join - Star pattern",
                "SELECT ?s ?p1 ?o1 ?p2 ?o2
WHERE {
    ?s ?p1 ?o1 .
    ?s ?p2 ?o2 .
    FILTER (?p1 != ?p2)
}
LIMIT 100",
            ),
            (
                "Join - Property chain",
                "SELECT ?s ?intermediate ?o
WHERE {
    ?s ?p1 ?intermediate .
    ?intermediate ?p2 ?o .
}
LIMIT 100",
            ),
        ],
        Category::Aggregation => &[
            (
                "Aggregation - Triples per predicate",
                "SELECT ?p (COUNT(*) AS ?count)
WHERE {
    ?s ?p ?o .
}
GROUP BY ?p
ORDER BY DESC(?count)
LIMIT 20",
            ),
            (
                "Aggregation - Entities per type",
                "SELECT ?type (COUNT(?entity) AS ?entityCount)
WHERE {
    ?entity rdf:type ?type .
}
GROUP BY ?type
ORDER BY DESC(?entityCount)
LIMIT 30",
            ),
        ],
        Category::Filter => &[
            (
                "Filter - Literal objects",
                "SELECT ?s ?p ?o
WHERE {
    ?s ?p ?o .
    FILTER (isLiteral(?o))
}
LIMIT 100",
            ),
            (
                "Filter - Labels in English or French",
                "SELECT ?entity ?label
WHERE {
    ?entity rdfs:label ?label .
    FILTER (LANG(?label) = \"en\" || LANG(?label) = \"fr\")
}
LIMIT 100",
            ),
        ],
        Category::Optional => &[
            (
                "OPTIONAL - Entities with descriptions",
                "SELECT ?entity ?label ?description
WHERE {
    ?entity rdfs:label ?label .
    OPTIONAL { ?entity rdfs:comment ?description . }
}
LIMIT 100",
            ),
            (
                "UNION - Classes and typed entities",
                "SELECT ?entity ?type
WHERE {
    { ?entity rdf:type ?type . }
    UNION
    {
        ?entity rdf:type owl:Class .
        BIND(owl:Class AS ?type)
    }
}
LIMIT 100",
            ),
        ],
        Category::Subquery => &[
            (
                "Subquery - Busy predicates",
                "SELECT ?p ?count
WHERE {
    {
        SELECT ?p (COUNT(?s) AS ?count)
        WHERE {
            ?s ?p ?o .
        }
        GROUP BY ?p
    }
    FILTER (?count > 10)
}
ORDER BY DESC(?count)
LIMIT 10",
            ),
            (
                "Subquery - Well connected entities",
                "SELECT ?entity ?connections
WHERE {
    {
        SELECT ?entity (COUNT(*) AS ?connections)
        WHERE {
            { ?entity ?p ?o . }
            UNION
            { ?s ?p ?entity . }
        }
        GROUP BY ?entity
    }
    FILTER (?connections > 5)
}
ORDER BY DESC(?connections)
LIMIT 20",
            ),
        ],
    }
}
