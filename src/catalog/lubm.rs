//! Lehigh University Benchmark queries

use super::Category;

pub const PREFIX: &str = "\
PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
PREFIX ub: <http://www.lehigh.edu/~zhp2/2004/0401/univ-bench.owl#>
";

pub fn queries(category: Category) -> &'static [(&'static str, &'static str)] {
    match category {
        Category::Simple => &[
            (
                "Simple - Publications by professor",
                "SELECT ?professor ?publication
WHERE {
    ?professor rdf:type ub:FullProfessor .
    ?publication ub:publicationAuthor ?professor .
}
LIMIT 100",
            ),
            (
                "Simple - Graduate students",
                "SELECT ?student ?name
WHERE {
    ?student rdf:type ub:GraduateStudent .
    ?student ub:name ?name .
}
LIMIT 100",
            ),
            (
                "Simple - Courses",
                "SELECT ?course ?name
WHERE {
    ?course rdf:type ub:Course .
    ?course ub:name ?name .
}
LIMIT 100",
            ),
        ],
        Category::Join => &[
            (
                "Join - Professors and their courses",
                "SELECT ?professor ?course ?department
WHERE {
    ?professor rdf:type ub:FullProfessor .
    ?professor ub:worksFor ?department .
    ?professor ub:teacherOf ?course .
}
LIMIT 100",
            ),
            (
                "Join - Students and advisors",
                "SELECT ?student ?advisor ?department
WHERE {
    ?student rdf:type ub:GraduateStudent .
    ?student ub:advisor ?advisor .
    ?student ub:memberOf ?department .
}
LIMIT 100",
            ),
        ],
        Category::Aggregation => &[
            (
                "Aggregation - Students per department",
                "SELECT ?department (COUNT(?student) AS ?studentCount)
WHERE {
    ?student rdf:type ub:GraduateStudent .
    ?student ub:memberOf ?department .
}
GROUP BY ?department
ORDER BY DESC(?studentCount)",
            ),
            (
                "Aggregation - Courses per professor",
                "SELECT ?professor (COUNT(?course) AS ?courseCount)
WHERE {
    ?professor rdf:type ub:FullProfessor .
    ?professor ub:teacherOf ?course .
}
GROUP BY ?professor
ORDER BY DESC(?courseCount)",
            ),
        ],
        Category::Filter => &[
            (
                "Filter - Computer science undergraduates",
                "SELECT ?student ?department
WHERE {
    ?student rdf:type ub:UndergraduateStudent .
    ?student ub:memberOf ?department .
    FILTER (CONTAINS(STR(?department), \"Computer\"))
}
LIMIT 100",
            ),
            (
                "Filter - Named courses",
                "SELECT ?course ?name
WHERE {
    ?course rdf:type ub:Course .
    ?course ub:name ?name .
    FILTER (STRLEN(?name) > 8)
}
LIMIT 100",
            ),
        ],
        Category::Optional => &[
            (
                "OPTIONAL - Students and advisors",
                "SELECT ?student ?advisor
WHERE {
    ?student rdf:type ub:GraduateStudent .
    OPTIONAL { ?student ub:advisor ?advisor . }
}
LIMIT 100",
            ),
            (
                "UNION - Academic staff",
                "SELECT ?person ?type ?department
WHERE {
    {
        ?person rdf:type ub:FullProfessor .
        ?person ub:worksFor ?department .
        BIND(\"Professor\" AS ?type)
    }
    UNION
    {
        ?person rdf:type ub:Lecturer .
        ?person ub:worksFor ?department .
        BIND(\"Lecturer\" AS ?type)
    }
}
LIMIT 100",
            ),
        ],
        Category::Subquery => &[
            (
                "Subquery - Largest departments",
                "SELECT ?department ?count
WHERE {
    {
        SELECT ?department (COUNT(?student) AS ?count)
        WHERE {
            ?student rdf:type ub:UndergraduateStudent .
            ?student ub:memberOf ?department .
        }
        GROUP BY ?department
    }
}
ORDER BY DESC(?count)
LIMIT 10",
            ),
            (
                "Subquery - Most prolific professors",
                "SELECT ?professor ?pubCount
WHERE {
    {
        SELECT ?professor (COUNT(?publication) AS ?pubCount)
        WHERE {
            ?professor rdf:type ub:FullProfessor .
            ?publication ub:publicationAuthor ?professor .
        }
        GROUP BY ?professor
    }
    FILTER (?pubCount > 5)
}
ORDER BY DESC(?pubCount)
LIMIT 20",
            ),
        ],
    }
}
